use async_trait::async_trait;

use crate::DomainError;
use crate::production::{ProductionBatch, ProductionDraft};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProductionRepository: Send + Sync {
    async fn create(&self, draft: &ProductionDraft) -> Result<ProductionBatch, DomainError>;

    async fn update(&self, id: i64, draft: &ProductionDraft) -> Result<ProductionBatch, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductionBatch>, DomainError>;
}
