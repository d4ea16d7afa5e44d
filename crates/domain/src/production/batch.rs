use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::DomainError;
use crate::opus::BatchContext;
use crate::serde_util::{count, optional_date, optional_text, text};

/// Editable header of a production batch. Sent whole on create and on
/// every update, so `observacion` always replaces the stored text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionDraft {
    #[serde(deserialize_with = "count")]
    pub cliente_id: i64,
    #[serde(default, deserialize_with = "optional_date")]
    pub fecha_opu: Option<NaiveDate>,
    #[serde(default, deserialize_with = "text")]
    pub lugar: String,
    #[serde(default, deserialize_with = "text")]
    pub finca: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub hora_inicio: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub hora_final: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub envase: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub fecha_transferencia: Option<NaiveDate>,
    #[serde(default, deserialize_with = "text")]
    pub observacion: String,
    #[serde(default)]
    pub output_ids: Vec<i64>,
}

impl ProductionDraft {
    pub fn new(cliente_id: i64, fecha_opu: NaiveDate) -> Self {
        Self {
            cliente_id,
            fecha_opu: Some(fecha_opu),
            ..Default::default()
        }
    }

    /// Required-field checks done before the create call.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.cliente_id <= 0 {
            return Err(DomainError::validation("Seleccione un cliente"));
        }
        if self.fecha_opu.is_none() {
            return Err(DomainError::validation("La fecha de OPU es obligatoria"));
        }
        Ok(())
    }
}

/// A persisted production batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionBatch {
    pub id: i64,
    #[serde(flatten)]
    pub header: ProductionDraft,
}

impl ProductionBatch {
    /// Context stamped onto the batch's OPU rows.
    pub fn opus_context(&self) -> BatchContext {
        BatchContext {
            production_id: self.id,
            cliente_id: self.header.cliente_id,
            lugar: self.header.lugar.clone(),
            finca: self.header.finca.clone(),
            fecha: self.header.fecha_opu,
        }
    }

    /// Records a semen withdrawal against this batch. Returns false when the
    /// output was already linked.
    pub fn link_output(&mut self, output_id: i64) -> bool {
        if self.header.output_ids.contains(&output_id) {
            return false;
        }
        self.header.output_ids.push(output_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_flattened_batch() {
        let batch: ProductionBatch = serde_json::from_value(json!({
            "id": 12,
            "cliente_id": 4,
            "fecha_opu": "2024-06-01T00:00:00",
            "lugar": "Sala 2",
            "finca": "El Roble",
            "hora_inicio": "08:00",
            "hora_final": null,
            "observacion": null,
            "output_ids": [3, 5]
        }))
        .unwrap();

        assert_eq!(batch.id, 12);
        assert_eq!(batch.header.cliente_id, 4);
        assert_eq!(batch.header.fecha_opu, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(batch.header.hora_final, None);
        assert_eq!(batch.header.observacion, "");
        assert_eq!(batch.header.output_ids, vec![3, 5]);

        let ctx = batch.opus_context();
        assert_eq!(ctx.production_id, 12);
        assert_eq!(ctx.finca, "El Roble");
    }

    #[test]
    fn test_draft_validation() {
        assert!(ProductionDraft::default().validate().is_err());
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(ProductionDraft::new(3, date).validate().is_ok());

        let mut draft = ProductionDraft::new(3, date);
        draft.fecha_opu = None;
        assert_eq!(
            draft.validate().unwrap_err().to_string(),
            "La fecha de OPU es obligatoria"
        );
    }

    #[test]
    fn test_link_output_is_idempotent() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut batch = ProductionBatch {
            id: 1,
            header: ProductionDraft::new(3, date),
        };
        assert!(batch.link_output(8));
        assert!(!batch.link_output(8));
        assert_eq!(batch.header.output_ids, vec![8]);
    }
}
