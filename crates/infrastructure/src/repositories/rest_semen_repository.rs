use async_trait::async_trait;
use domain::{
    DomainError, NewSemenOutput, Page, PageRequest, SemenInput, SemenInputRepository, SemenOutput,
    SemenOutputRepository,
};
use serde::Serialize;

use crate::http::{ApiClient, QueryParams};

#[derive(Serialize)]
struct QuantityTakenUpdate {
    quantity_taken: i64,
}

/// Semen inputs and outputs share one client; a withdrawal touches both.
pub struct RestSemenRepository {
    api: ApiClient,
}

impl RestSemenRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SemenInputRepository for RestSemenRepository {
    async fn find_by_user(&self, user_id: i64, page: PageRequest) -> Result<Page<SemenInput>, DomainError> {
        self.api
            .get_list(
                &format!("/inputs/user/{user_id}"),
                &QueryParams::new().page(page),
            )
            .await
    }

    async fn update_quantity_taken(&self, id: i64, quantity_taken: i64) -> Result<SemenInput, DomainError> {
        self.api
            .put(&format!("/inputs/{id}"), &QuantityTakenUpdate { quantity_taken })
            .await
    }
}

#[async_trait]
impl SemenOutputRepository for RestSemenRepository {
    async fn create(&self, input_id: i64, output: &NewSemenOutput) -> Result<SemenOutput, DomainError> {
        self.api.post(&format!("/outputs/{input_id}"), output).await
    }
}
