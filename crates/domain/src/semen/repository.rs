use async_trait::async_trait;

use crate::semen::{NewSemenOutput, SemenInput, SemenOutput};
use crate::{DomainError, Page, PageRequest};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SemenInputRepository: Send + Sync {
    /// Inputs owned by a client, paginated with `skip`/`limit`.
    async fn find_by_user(&self, user_id: i64, page: PageRequest) -> Result<Page<SemenInput>, DomainError>;

    /// Sets the cumulative usage of an input.
    async fn update_quantity_taken(&self, id: i64, quantity_taken: i64) -> Result<SemenInput, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SemenOutputRepository: Send + Sync {
    async fn create(&self, input_id: i64, output: &NewSemenOutput) -> Result<SemenOutput, DomainError>;
}
