use async_trait::async_trait;

use crate::DomainError;
use crate::opus::{OpusPayload, OpusRecord};

/// Remote store of OPU rows.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait OpusRepository: Send + Sync {
    async fn create(&self, payload: &OpusPayload) -> Result<OpusRecord, DomainError>;

    async fn update(&self, id: i64, payload: &OpusPayload) -> Result<OpusRecord, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Every row of a production batch, in backend order.
    async fn find_by_production(&self, production_id: i64) -> Result<Vec<OpusRecord>, DomainError>;
}
