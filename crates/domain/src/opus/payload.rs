use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::opus::OpusRecord;
use crate::opus::metrics::YieldPercentages;

/// Batch-level values stamped onto every OPU row sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchContext {
    pub production_id: i64,
    pub cliente_id: i64,
    pub lugar: String,
    pub finca: String,
    pub fecha: Option<NaiveDate>,
}

/// Body of a create or update call for one OPU row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpusPayload {
    pub production_id: i64,
    pub cliente_id: i64,
    pub lugar: String,
    pub finca: String,
    pub fecha: Option<NaiveDate>,

    pub order: i64,
    pub donante_code: String,
    pub race: String,
    pub toro: Option<String>,
    pub toro_id: Option<i64>,
    pub toro_name: Option<String>,

    pub gi: i64,
    pub gii: i64,
    pub giii: i64,
    pub otros: i64,
    pub viables: i64,
    pub total_oocitos: i64,

    pub ctv: i64,
    pub clivados: i64,
    pub prevision: i64,
    pub empaque: i64,
    pub vt_dt: i64,

    pub porcentaje_cliv: String,
    pub porcentaje_prevision: String,
    pub porcentaje_empaque: String,
    pub porcentaje_vtdt: String,
    pub total_embriones: i64,
    pub porcentaje_total_embriones: String,
}

impl OpusPayload {
    pub fn build(record: &OpusRecord, context: &BatchContext) -> Self {
        let yields = record.yields();
        Self::with_yields(record, context, &yields)
    }

    pub fn with_yields(record: &OpusRecord, context: &BatchContext, yields: &YieldPercentages) -> Self {
        Self {
            production_id: context.production_id,
            cliente_id: context.cliente_id,
            lugar: context.lugar.clone(),
            finca: context.finca.clone(),
            fecha: context.fecha,
            order: record.order,
            donante_code: record.donante_code.clone(),
            race: record.race.clone(),
            toro: record.toro.clone(),
            toro_id: record.toro_id,
            toro_name: record.toro_name.clone(),
            gi: record.gi,
            gii: record.gii,
            giii: record.giii,
            otros: record.otros,
            viables: record.viables,
            total_oocitos: record.total_oocitos,
            ctv: record.ctv,
            clivados: record.clivados,
            prevision: record.prevision,
            empaque: record.empaque,
            vt_dt: record.vt_dt,
            porcentaje_cliv: yields.porcentaje_cliv.clone(),
            porcentaje_prevision: yields.porcentaje_prevision.clone(),
            porcentaje_empaque: yields.porcentaje_empaque.clone(),
            porcentaje_vtdt: yields.porcentaje_vtdt.clone(),
            total_embriones: yields.total_embriones,
            porcentaje_total_embriones: yields.porcentaje_total_embriones.clone(),
        }
    }

    /// What a backend that echoes the payload would answer with.
    pub fn into_record(self, id: i64) -> OpusRecord {
        let mut record = OpusRecord::blank(self.order);
        record.id = Some(id);
        record.production_id = Some(self.production_id);
        record.donante_code = self.donante_code;
        record.race = self.race;
        record.toro = self.toro;
        record.toro_id = self.toro_id;
        record.toro_name = self.toro_name;
        record.gi = self.gi;
        record.gii = self.gii;
        record.giii = self.giii;
        record.otros = self.otros;
        record.viables = self.viables;
        record.total_oocitos = self.total_oocitos;
        record.ctv = self.ctv;
        record.clivados = self.clivados;
        record.prevision = self.prevision;
        record.empaque = self.empaque;
        record.vt_dt = self.vt_dt;
        record.porcentaje_cliv = self.porcentaje_cliv;
        record.porcentaje_prevision = self.porcentaje_prevision;
        record.porcentaje_empaque = self.porcentaje_empaque;
        record.porcentaje_vtdt = self.porcentaje_vtdt;
        record.total_embriones = self.total_embriones;
        record.porcentaje_total_embriones = self.porcentaje_total_embriones;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opus::OpusField;

    fn context() -> BatchContext {
        BatchContext {
            production_id: 9,
            cliente_id: 3,
            lugar: "Montería".to_string(),
            finca: "La Esperanza".to_string(),
            fecha: NaiveDate::from_ymd_opt(2024, 5, 14),
        }
    }

    #[test]
    fn test_payload_carries_context_and_percentages() {
        let mut row = OpusRecord::blank(1);
        row.set_field(OpusField::Ctv, "15");
        row.set_field(OpusField::Clivados, "7");
        row.set_field(OpusField::Prevision, "5");

        let payload = OpusPayload::build(&row, &context());
        assert_eq!(payload.production_id, 9);
        assert_eq!(payload.cliente_id, 3);
        assert_eq!(payload.finca, "La Esperanza");
        assert_eq!(payload.porcentaje_cliv, "47%");
        assert_eq!(payload.porcentaje_prevision, "33%");
        assert_eq!(payload.total_embriones, 5);
        assert_eq!(payload.porcentaje_total_embriones, "33%");
        assert_eq!(payload.porcentaje_empaque, "0%");
    }

    #[test]
    fn test_payload_serializes_date() {
        let payload = OpusPayload::build(&OpusRecord::blank(1), &context());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["fecha"], "2024-05-14");
        assert_eq!(value["order"], 1);
    }

    #[test]
    fn test_into_record_echo() {
        let mut row = OpusRecord::blank(4);
        row.set_field(OpusField::Gi, "6");
        let echoed = OpusPayload::build(&row, &context()).into_record(31);
        assert_eq!(echoed.id, Some(31));
        assert_eq!(echoed.order, 4);
        assert_eq!(echoed.viables, 6);
    }
}
