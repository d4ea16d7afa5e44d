//! Laboratory clients (cattle owners).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::serde_util::{optional_text, text};
use crate::{DomainError, Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(default, deserialize_with = "text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub document: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub email: Option<String>,
}

impl Client {
    pub fn new(id: i64, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            document: None,
            email: None,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            "Sin nombre"
        } else {
            &self.full_name
        }
    }
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Free-text search over name, document and email.
    async fn search(&self, query: &str, page: PageRequest) -> Result<Page<Client>, DomainError>;
}
