use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use domain::{Client, ClientRepository, PageRequest};

use crate::search::Debouncer;

/// Latest search results as seen by the client picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub clients: Vec<Client>,
    pub total: u64,
    pub error: Option<String>,
}

/// Search-as-you-type over clients.
pub struct ClientSearch {
    repository: Arc<dyn ClientRepository>,
    debouncer: Debouncer,
    page: PageRequest,
    state: Arc<watch::Sender<SearchState>>,
}

impl ClientSearch {
    pub fn new(repository: Arc<dyn ClientRepository>, delay: Duration, page_size: u64) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            repository,
            debouncer: Debouncer::new(delay),
            page: PageRequest::first(page_size),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Handles one keystroke. A blank query clears the results at once
    /// without a request.
    pub fn on_input(&self, query: &str) -> JoinHandle<()> {
        let query = query.trim().to_string();

        if query.is_empty() {
            self.debouncer.cancel();
            self.state.send_replace(SearchState::default());
            return tokio::spawn(async {});
        }

        let repository = Arc::clone(&self.repository);
        let state = Arc::clone(&self.state);
        let page = self.page;
        self.debouncer.call(async move {
            debug!(%query, "Searching clients");
            let next = match repository.search(&query, page).await {
                Ok(found) => SearchState {
                    query,
                    clients: found.items,
                    total: found.total,
                    error: None,
                },
                Err(e) => {
                    error!(%query, error = %e, "Client search failed");
                    SearchState {
                        query,
                        clients: Vec::new(),
                        total: 0,
                        error: Some(e.user_message()),
                    }
                }
            };
            state.send_replace(next);
        })
    }
}
