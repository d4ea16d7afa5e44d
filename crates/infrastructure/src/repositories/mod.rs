//! Repository implementations backed by the REST API.

pub mod rest_bull_repository;
pub mod rest_client_repository;
pub mod rest_opus_repository;
pub mod rest_production_repository;
pub mod rest_semen_repository;

pub use rest_bull_repository::RestBullRepository;
pub use rest_client_repository::RestClientRepository;
pub use rest_opus_repository::RestOpusRepository;
pub use rest_production_repository::RestProductionRepository;
pub use rest_semen_repository::RestSemenRepository;
