use async_trait::async_trait;
use domain::{Client, ClientRepository, DomainError, Page, PageRequest};

use crate::http::{ApiClient, QueryParams};

pub struct RestClientRepository {
    api: ApiClient,
}

impl RestClientRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ClientRepository for RestClientRepository {
    async fn search(&self, query: &str, page: PageRequest) -> Result<Page<Client>, DomainError> {
        let params = QueryParams::new().page(page).text("search", Some(query));
        self.api.get_list("/users/", &params).await
    }
}
