use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use domain::semen::{REMARK_AUTOMATIC, REMARK_MANUAL};
use domain::{
    DomainError, NewSemenOutput, PageRequest, SemenInput, SemenInputRepository, SemenOutput,
    SemenOutputRepository,
};

use crate::session::SessionContext;

pub const DEFAULT_STATUS_WINDOW: Duration = Duration::from_secs(3);

/// A withdrawal expressed as the new cumulative usage of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub input_id: i64,
    pub new_quantity_taken: i64,
    pub remark: Option<String>,
    /// Attach the output to the session's open production.
    pub for_production: bool,
}

impl WithdrawalRequest {
    pub fn new(input_id: i64, new_quantity_taken: i64) -> Self {
        Self {
            input_id,
            new_quantity_taken,
            remark: None,
            for_production: false,
        }
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    pub fn for_production(mut self) -> Self {
        self.for_production = true;
        self
    }

    fn remark_or_default(&self) -> String {
        match self.remark.as_deref().map(str::trim) {
            Some(remark) if !remark.is_empty() => remark.to_string(),
            _ if self.for_production => REMARK_AUTOMATIC.to_string(),
            _ => REMARK_MANUAL.to_string(),
        }
    }
}

/// Usage being edited for one input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEdit {
    pub input_id: i64,
    pub quantity_taken: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Saved,
    Error(String),
}

#[derive(Debug, Clone)]
struct RowStatus {
    outcome: RowOutcome,
    recorded_at: Instant,
}

/// Straw totals across a set of inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub received: i64,
    pub taken: i64,
    pub available: i64,
}

/// Semen inventory of the selected client, with withdrawals.
///
/// A withdrawal is two backend calls: raise the input's `quantity_taken`,
/// then record an output for the difference. They are not transactional;
/// if the second call fails the input keeps its new usage without a
/// matching output. The list is re-read from the backend after every
/// attempt either way.
pub struct SemenAllocationLedger {
    session: Arc<SessionContext>,
    inputs: Arc<dyn SemenInputRepository>,
    outputs: Arc<dyn SemenOutputRepository>,
    rows: Vec<SemenInput>,
    total: u64,
    page: PageRequest,
    editing: Option<PendingEdit>,
    statuses: HashMap<i64, RowStatus>,
    status_window: Duration,
}

impl SemenAllocationLedger {
    pub fn new(
        session: Arc<SessionContext>,
        inputs: Arc<dyn SemenInputRepository>,
        outputs: Arc<dyn SemenOutputRepository>,
    ) -> Self {
        Self {
            session,
            inputs,
            outputs,
            rows: Vec::new(),
            total: 0,
            page: PageRequest::default(),
            editing: None,
            statuses: HashMap::new(),
            status_window: DEFAULT_STATUS_WINDOW,
        }
    }

    /// How long a saved/error badge stays visible.
    pub fn with_status_window(mut self, window: Duration) -> Self {
        self.status_window = window;
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub fn rows(&self) -> &[SemenInput] {
        &self.rows
    }

    pub fn row(&self, input_id: i64) -> Option<&SemenInput> {
        self.rows.iter().find(|row| row.id == input_id)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn set_page(&mut self, page: PageRequest) {
        self.page = page;
    }

    pub async fn refresh(&mut self) -> Result<usize, DomainError> {
        let client_id = self.session.client_id()?;
        let page = self
            .inputs
            .find_by_user(client_id, self.page)
            .await
            .inspect_err(|e| error!(client_id, error = %e, "Failed to load semen inputs"))?;

        debug!(client_id, rows = page.items.len(), total = page.total, "Semen inputs loaded");
        self.rows = page.items;
        self.total = page.total;
        Ok(self.rows.len())
    }

    /// Totals over the loaded rows, optionally for a single bull.
    pub fn balance(&self, bull_id: Option<i64>) -> Balance {
        self.rows
            .iter()
            .filter(|row| bull_id.is_none() || row.bull_id == bull_id)
            .fold(Balance::default(), |acc, row| Balance {
                received: acc.received.saturating_add(row.quantity_received),
                taken: acc.taken.saturating_add(row.quantity_taken),
                available: acc.available.saturating_add(row.available()),
            })
    }

    /// Starts editing a row, seeded with its current usage.
    pub fn begin_edit(&mut self, input_id: i64) -> Result<PendingEdit, DomainError> {
        let row = self
            .row(input_id)
            .ok_or_else(|| DomainError::NotFound(format!("Entrada {input_id}")))?;
        let edit = PendingEdit {
            input_id,
            quantity_taken: row.quantity_taken,
        };
        self.editing = Some(edit);
        Ok(edit)
    }

    pub fn set_edit_quantity(&mut self, quantity_taken: i64) {
        if let Some(edit) = self.editing.as_mut() {
            edit.quantity_taken = quantity_taken;
        }
    }

    pub fn editing(&self) -> Option<PendingEdit> {
        self.editing
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Commits the row being edited as a withdrawal.
    pub async fn commit_edit(&mut self, remark: Option<String>) -> Result<SemenOutput, DomainError> {
        let edit = self
            .editing
            .ok_or_else(|| DomainError::validation("No hay ninguna fila en edición"))?;
        let mut request = WithdrawalRequest::new(edit.input_id, edit.quantity_taken);
        request.remark = remark;
        self.commit_withdrawal(request).await
    }

    pub async fn commit_withdrawal(&mut self, request: WithdrawalRequest) -> Result<SemenOutput, DomainError> {
        let input_id = request.input_id;
        let new_taken = request.new_quantity_taken;

        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == input_id)
            .ok_or_else(|| DomainError::NotFound(format!("Entrada {input_id}")))?;

        let quantity_output = row.withdrawal_delta(new_taken)?;
        if quantity_output == 0 {
            return Err(DomainError::validation("La cantidad utilizada no ha cambiado"));
        }
        let production_id = if request.for_production {
            Some(self.session.require_production()?.id)
        } else {
            None
        };

        let previous = row.quantity_taken;
        row.apply_taken(new_taken);
        self.editing = Some(PendingEdit {
            input_id,
            quantity_taken: new_taken,
        });

        let output = NewSemenOutput {
            quantity_output,
            output_date: Local::now().naive_local(),
            remark: request.remark_or_default(),
            produccion_embrionaria_id: production_id,
        };

        let result = self.write_withdrawal(input_id, new_taken, &output).await;

        match &result {
            Ok(saved) => {
                info!(
                    input_id,
                    previous,
                    quantity_taken = new_taken,
                    output_id = saved.id,
                    "Semen withdrawal recorded"
                );
                self.editing = None;
                self.record_status(input_id, RowOutcome::Saved);
            }
            Err(e) => {
                error!(input_id, previous, quantity_taken = new_taken, error = %e, "Semen withdrawal failed");
                self.record_status(input_id, RowOutcome::Error(e.user_message()));
            }
        }

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Could not re-read semen inputs after withdrawal");
        }

        result
    }

    async fn write_withdrawal(
        &self,
        input_id: i64,
        new_taken: i64,
        output: &NewSemenOutput,
    ) -> Result<SemenOutput, DomainError> {
        self.inputs.update_quantity_taken(input_id, new_taken).await?;
        self.outputs.create(input_id, output).await
    }

    fn record_status(&mut self, input_id: i64, outcome: RowOutcome) {
        self.statuses.insert(
            input_id,
            RowStatus {
                outcome,
                recorded_at: Instant::now(),
            },
        );
    }

    /// Outcome of the last withdrawal on a row, while still on display.
    pub fn status(&self, input_id: i64) -> Option<&RowOutcome> {
        self.statuses
            .get(&input_id)
            .filter(|status| status.recorded_at.elapsed() < self.status_window)
            .map(|status| &status.outcome)
    }

    /// Drops statuses whose display window has passed.
    pub fn prune_statuses(&mut self) {
        let window = self.status_window;
        self.statuses
            .retain(|_, status| status.recorded_at.elapsed() < window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_remarks() {
        assert_eq!(WithdrawalRequest::new(1, 2).remark_or_default(), "Sin comentario");
        assert_eq!(
            WithdrawalRequest::new(1, 2).for_production().remark_or_default(),
            "Registro automático"
        );
        assert_eq!(
            WithdrawalRequest::new(1, 2).with_remark("  ").remark_or_default(),
            "Sin comentario"
        );
        assert_eq!(
            WithdrawalRequest::new(1, 2)
                .with_remark("Para OPU 12")
                .for_production()
                .remark_or_default(),
            "Para OPU 12"
        );
    }
}
