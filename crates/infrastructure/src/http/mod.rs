//! Plain HTTP access to the laboratory REST backend.

pub mod api_client;
pub mod envelope;
pub mod error;
pub mod query;

pub use api_client::ApiClient;
pub use envelope::ListEnvelope;
pub use error::extract_detail;
pub use query::QueryParams;
