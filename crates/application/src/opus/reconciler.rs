use std::sync::Arc;

use futures::future::{try_join, try_join_all};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use domain::{
    Bull, BullRepository, DomainError, OpusField, OpusPayload, OpusRecord, OpusRepository,
};

use crate::session::SessionContext;

/// Rows written by one successful `save`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveSummary {
    pub created: usize,
    pub updated: usize,
}

impl SaveSummary {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0
    }
}

/// Keeps the OPU grid of the open production in step with the backend.
///
/// Rows added locally stay unpersisted until `save`, which creates them and
/// updates every existing row whose watched fields drifted from the last
/// synced snapshot. Creates and updates are issued concurrently and awaited
/// as one; the first failure fails the whole save and nothing is merged
/// back, even though sibling calls may already have landed server-side.
pub struct OpusRecordReconciler {
    session: Arc<SessionContext>,
    repository: Arc<dyn OpusRepository>,
    bull_repository: Arc<dyn BullRepository>,
    rows: Vec<OpusRecord>,
    bulls: Vec<Bull>,
}

impl OpusRecordReconciler {
    pub fn new(
        session: Arc<SessionContext>,
        repository: Arc<dyn OpusRepository>,
        bull_repository: Arc<dyn BullRepository>,
    ) -> Self {
        Self {
            session,
            repository,
            bull_repository,
            rows: Vec::new(),
            bulls: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[OpusRecord] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&OpusRecord> {
        self.rows.get(index)
    }

    pub fn bulls(&self) -> &[Bull] {
        &self.bulls
    }

    /// Replaces the grid with the open production's rows.
    pub async fn load(&mut self) -> Result<usize, DomainError> {
        let production = self.session.require_production()?;

        let fetched = self
            .repository
            .find_by_production(production.id)
            .await
            .inspect_err(|e| {
                error!(production_id = production.id, error = %e, "Failed to load OPU rows");
            })?;

        let mut rows: Vec<OpusRecord> = fetched
            .into_iter()
            .enumerate()
            .map(|(position, row)| row.into_loaded(position))
            .collect();
        rows.sort_by_key(|row| row.order);

        info!(production_id = production.id, rows = rows.len(), "OPU rows loaded");
        self.rows = rows;
        Ok(self.rows.len())
    }

    /// Fetches the selected client's bulls for `toro_id` resolution.
    pub async fn load_bulls(&mut self) -> Result<usize, DomainError> {
        let client_id = self.session.client_id()?;
        let bulls = self
            .bull_repository
            .find_by_user(client_id)
            .await
            .inspect_err(|e| error!(client_id, error = %e, "Failed to load bulls"))?;
        self.set_bulls(bulls);
        Ok(self.bulls.len())
    }

    pub fn set_bulls(&mut self, bulls: Vec<Bull>) {
        debug!(count = bulls.len(), "Bull list replaced");
        self.bulls = bulls;
    }

    /// Appends an unpersisted row after the highest order in the grid.
    /// Returns its index.
    pub fn add_row(&mut self) -> usize {
        let next_order = self.rows.iter().map(|row| row.order).max().unwrap_or(0) + 1;
        let mut row = OpusRecord::blank(next_order);
        row.production_id = self.session.production().map(|batch| batch.id);
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Writes a raw form value. Selecting a bull also stores its name when
    /// the bull is in the loaded list.
    pub fn update_field(&mut self, index: usize, field: OpusField, raw: &str) -> Result<(), DomainError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or_else(|| DomainError::NotFound(format!("Fila {index}")))?;

        row.set_field(field, raw);

        if field == OpusField::ToroId {
            row.toro_name = row
                .toro_id
                .and_then(|id| Bull::find(&self.bulls, id))
                .map(|bull| bull.name.clone());
            if row.toro_id.is_some() && row.toro_name.is_none() {
                debug!(toro_id = ?row.toro_id, "Bull not in loaded list, name left empty");
            }
        }
        Ok(())
    }

    /// Removes a row. Persisted rows are deleted on the backend first and
    /// stay in the grid if that fails.
    pub async fn remove_row(&mut self, index: usize) -> Result<OpusRecord, DomainError> {
        let row = self
            .rows
            .get(index)
            .ok_or_else(|| DomainError::NotFound(format!("Fila {index}")))?;

        if let (true, Some(id)) = (row.is_persisted(), row.id) {
            self.repository.delete(id).await.inspect_err(|e| {
                error!(opus_id = id, error = %e, "Failed to delete OPU row");
            })?;
            info!(opus_id = id, "OPU row deleted");
        }

        Ok(self.rows.remove(index))
    }

    /// Rows that `save` would create and update right now.
    pub fn pending(&self) -> SaveSummary {
        self.rows.iter().fold(SaveSummary::default(), |mut acc, row| {
            if !row.is_existing {
                acc.created += 1;
            } else if row.has_changes() {
                match row.id {
                    Some(_) => acc.updated += 1,
                    None => acc.created += 1,
                }
            }
            acc
        })
    }

    pub async fn save(&mut self) -> Result<SaveSummary, DomainError> {
        let production = self.session.require_production()?;
        let context = production.opus_context();

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            if !row.is_existing {
                creates.push((index, OpusPayload::build(row, &context)));
            } else if row.has_changes() {
                match row.id {
                    Some(id) => updates.push((index, id, OpusPayload::build(row, &context))),
                    None => {
                        warn!(order = row.order, "Existing row has no id, creating it instead");
                        creates.push((index, OpusPayload::build(row, &context)));
                    }
                }
            }
        }

        if creates.is_empty() && updates.is_empty() {
            debug!(production_id = production.id, "No OPU changes to save");
            return Ok(SaveSummary::default());
        }

        let repository = &self.repository;
        let create_calls = creates.iter().map(|(index, payload)| async move {
            repository.create(payload).await.map(|saved| (*index, saved))
        });
        let update_calls = updates.iter().map(|(index, id, payload)| async move {
            repository.update(*id, payload).await.map(|saved| (*index, saved))
        });

        let (created, updated) = try_join(try_join_all(create_calls), try_join_all(update_calls))
            .await
            .inspect_err(|e| {
                error!(production_id = production.id, error = %e, "OPU save failed");
            })?;

        let summary = SaveSummary {
            created: created.len(),
            updated: updated.len(),
        };

        for (index, saved) in created.into_iter().chain(updated) {
            let row = &mut self.rows[index];
            let yields = row.yields();
            row.apply_yields(&yields);
            row.production_id = Some(context.production_id);
            row.mark_synced(&saved);
        }

        info!(
            production_id = production.id,
            created = summary.created,
            updated = summary.updated,
            "OPU rows saved"
        );
        Ok(summary)
    }
}
