//! Infrastructure layer - External integrations

pub mod config;
pub mod http;
pub mod repositories;

pub use config::LabConfig;
pub use http::ApiClient;
pub use repositories::{
    RestBullRepository, RestClientRepository, RestOpusRepository, RestProductionRepository,
    RestSemenRepository,
};
