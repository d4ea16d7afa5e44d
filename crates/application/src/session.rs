//! Selection state shared by every workflow of one operator session.

use std::sync::{PoisonError, RwLock};

use domain::{Client, DomainError, ProductionBatch};
use tracing::debug;

/// The selected client and the open production batch.
///
/// Workflows receive this by `Arc` at construction instead of reading
/// ambient globals, so switching the client in one place is seen by all.
#[derive(Debug, Default)]
pub struct SessionContext {
    client: RwLock<Option<Client>>,
    production: RwLock<Option<ProductionBatch>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a client. An open production belonging to another client is
    /// closed.
    pub fn select_client(&self, client: Client) {
        let client_id = client.id;
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = Some(client);

        let mut production = self.production.write().unwrap_or_else(PoisonError::into_inner);
        if production
            .as_ref()
            .is_some_and(|batch| batch.header.cliente_id != client_id)
        {
            debug!(client_id, "Closing production of previous client");
            *production = None;
        }
    }

    pub fn client(&self) -> Option<Client> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn client_id(&self) -> Result<i64, DomainError> {
        self.client()
            .map(|client| client.id)
            .ok_or_else(|| DomainError::validation("Seleccione un cliente"))
    }

    pub fn set_production(&self, batch: ProductionBatch) {
        *self.production.write().unwrap_or_else(PoisonError::into_inner) = Some(batch);
    }

    pub fn production(&self) -> Option<ProductionBatch> {
        self.production
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn require_production(&self) -> Result<ProductionBatch, DomainError> {
        self.production()
            .ok_or_else(|| DomainError::validation("Primero debe crear o seleccionar una producción"))
    }

    pub fn clear_production(&self) {
        *self.production.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::ProductionDraft;

    fn batch(id: i64, cliente_id: i64) -> ProductionBatch {
        ProductionBatch {
            id,
            header: ProductionDraft::new(cliente_id, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
        }
    }

    #[test]
    fn test_client_required() {
        let session = SessionContext::new();
        assert!(session.client_id().unwrap_err().is_validation());
        session.select_client(Client::new(4, "Finca Norte"));
        assert_eq!(session.client_id().unwrap(), 4);
    }

    #[test]
    fn test_switching_client_closes_foreign_production() {
        let session = SessionContext::new();
        session.select_client(Client::new(4, "A"));
        session.set_production(batch(10, 4));

        session.select_client(Client::new(4, "A"));
        assert_eq!(session.production().map(|b| b.id), Some(10));

        session.select_client(Client::new(5, "B"));
        assert!(session.production().is_none());
        assert!(session.require_production().is_err());
    }
}
