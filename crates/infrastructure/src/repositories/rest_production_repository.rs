use async_trait::async_trait;
use domain::{DomainError, ProductionBatch, ProductionDraft, ProductionRepository};

use crate::http::ApiClient;

const BASE: &str = "/produccion-embrionaria";

pub struct RestProductionRepository {
    api: ApiClient,
}

impl RestProductionRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProductionRepository for RestProductionRepository {
    async fn create(&self, draft: &ProductionDraft) -> Result<ProductionBatch, DomainError> {
        self.api.post(&format!("{BASE}/"), draft).await
    }

    async fn update(&self, id: i64, draft: &ProductionDraft) -> Result<ProductionBatch, DomainError> {
        self.api.put(&format!("{BASE}/{id}"), draft).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductionBatch>, DomainError> {
        self.api.get_optional(&format!("{BASE}/{id}")).await
    }
}
