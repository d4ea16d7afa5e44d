use async_trait::async_trait;
use domain::{DomainError, OpusPayload, OpusRecord, OpusRepository};

use crate::http::{ApiClient, QueryParams};

pub struct RestOpusRepository {
    api: ApiClient,
}

impl RestOpusRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OpusRepository for RestOpusRepository {
    async fn create(&self, payload: &OpusPayload) -> Result<OpusRecord, DomainError> {
        self.api.post("/opus/", payload).await
    }

    async fn update(&self, id: i64, payload: &OpusPayload) -> Result<OpusRecord, DomainError> {
        self.api.put(&format!("/opus/{id}"), payload).await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.api.delete(&format!("/opus/{id}")).await
    }

    async fn find_by_production(&self, production_id: i64) -> Result<Vec<OpusRecord>, DomainError> {
        let page = self
            .api
            .get_list(&format!("/opus/production/{production_id}"), &QueryParams::new())
            .await?;
        Ok(page.items)
    }
}
