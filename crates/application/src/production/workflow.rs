use std::sync::Arc;

use tracing::{error, info};

use domain::{DomainError, ProductionBatch, ProductionDraft, ProductionRepository, SemenOutput};

use crate::session::SessionContext;

/// Lifecycle of the production batch open in the session: created once,
/// then only updated until it is closed.
pub struct ProductionWorkflow {
    session: Arc<SessionContext>,
    repository: Arc<dyn ProductionRepository>,
}

impl ProductionWorkflow {
    pub fn new(session: Arc<SessionContext>, repository: Arc<dyn ProductionRepository>) -> Self {
        Self {
            session,
            repository,
        }
    }

    /// Opens an existing batch.
    pub async fn select(&self, production_id: i64) -> Result<ProductionBatch, DomainError> {
        let batch = self
            .repository
            .find_by_id(production_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Producción {production_id}")))?;

        let foreign = self
            .session
            .client()
            .is_some_and(|client| client.id != batch.header.cliente_id);
        if foreign {
            return Err(DomainError::validation(
                "La producción pertenece a otro cliente",
            ));
        }

        self.session.set_production(batch.clone());
        info!(production_id, "Production opened");
        Ok(batch)
    }

    /// Creates the batch for the selected client. Refused while a batch is
    /// already open; an open batch can only be updated.
    pub async fn create(&self, mut draft: ProductionDraft) -> Result<ProductionBatch, DomainError> {
        if let Some(open) = self.session.production() {
            return Err(DomainError::validation(format!(
                "La producción {} ya fue creada",
                open.id
            )));
        }

        let client_id = self.session.client_id()?;
        if draft.cliente_id == 0 {
            draft.cliente_id = client_id;
        }
        draft.validate()?;

        let batch = self
            .repository
            .create(&draft)
            .await
            .inspect_err(|e| error!(client_id, error = %e, "Failed to create production"))?;

        self.session.set_production(batch.clone());
        info!(production_id = batch.id, client_id, "Production created");
        Ok(batch)
    }

    /// Replaces the open batch's header. `observacion` is sent as given and
    /// overwrites the stored text.
    pub async fn update(&self, draft: ProductionDraft) -> Result<ProductionBatch, DomainError> {
        let open = self.session.require_production()?;
        draft.validate()?;

        let batch = self
            .repository
            .update(open.id, &draft)
            .await
            .inspect_err(|e| error!(production_id = open.id, error = %e, "Failed to update production"))?;

        self.session.set_production(batch.clone());
        info!(production_id = batch.id, "Production updated");
        Ok(batch)
    }

    /// Links a semen withdrawal to the open batch and persists the link.
    pub async fn link_output(&self, output: &SemenOutput) -> Result<ProductionBatch, DomainError> {
        let mut open = self.session.require_production()?;
        if !open.link_output(output.id) {
            return Ok(open);
        }
        self.update(open.header).await
    }

    pub fn close(&self) {
        self.session.clear_production();
    }
}
