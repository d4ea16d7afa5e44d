use async_trait::async_trait;
use domain::{Bull, BullRepository, DomainError};

use crate::http::{ApiClient, QueryParams};

pub struct RestBullRepository {
    api: ApiClient,
}

impl RestBullRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BullRepository for RestBullRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Bull>, DomainError> {
        let page = self
            .api
            .get_list(&format!("/bulls/user/{user_id}"), &QueryParams::new())
            .await?;
        Ok(page.items)
    }
}
