use async_trait::async_trait;

use crate::DomainError;
use crate::bull::Bull;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait BullRepository: Send + Sync {
    /// Bulls registered for a client.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Bull>, DomainError>;
}
