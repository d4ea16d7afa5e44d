use serde::{Deserialize, Serialize};

use crate::opus::OpusField;
use crate::opus::metrics::{self, YieldPercentages};
use crate::serde_util::{coerce_count, count, optional_count, optional_text, text};

/// One donor collection event inside a production batch.
///
/// Rows live in two worlds at once: the operator's grid and the backend.
/// `is_existing`/`created`/`original` track which side a row came from and
/// what the backend last saw, and are never sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpusRecord {
    #[serde(default, deserialize_with = "optional_count", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, alias = "produccion_embrionaria_id", deserialize_with = "optional_count")]
    pub production_id: Option<i64>,
    #[serde(default, deserialize_with = "count")]
    pub order: i64,

    #[serde(default, deserialize_with = "text")]
    pub donante_code: String,
    #[serde(default, deserialize_with = "text")]
    pub race: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub toro: Option<String>,
    #[serde(default, deserialize_with = "optional_count")]
    pub toro_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub toro_name: Option<String>,

    #[serde(default, deserialize_with = "count")]
    pub gi: i64,
    #[serde(default, deserialize_with = "count")]
    pub gii: i64,
    #[serde(default, deserialize_with = "count")]
    pub giii: i64,
    #[serde(default, deserialize_with = "count")]
    pub otros: i64,
    #[serde(default, deserialize_with = "count")]
    pub viables: i64,
    #[serde(default, deserialize_with = "count")]
    pub total_oocitos: i64,

    #[serde(default, deserialize_with = "count")]
    pub ctv: i64,
    #[serde(default, deserialize_with = "count")]
    pub clivados: i64,
    #[serde(default, deserialize_with = "count")]
    pub prevision: i64,
    #[serde(default, deserialize_with = "count")]
    pub empaque: i64,
    #[serde(default, deserialize_with = "count")]
    pub vt_dt: i64,

    #[serde(default, deserialize_with = "text")]
    pub porcentaje_cliv: String,
    #[serde(default, deserialize_with = "text")]
    pub porcentaje_prevision: String,
    #[serde(default, deserialize_with = "text")]
    pub porcentaje_empaque: String,
    #[serde(default, deserialize_with = "text")]
    pub porcentaje_vtdt: String,
    #[serde(default, deserialize_with = "count")]
    pub total_embriones: i64,
    #[serde(default, deserialize_with = "text")]
    pub porcentaje_total_embriones: String,

    #[serde(skip)]
    pub is_existing: bool,
    #[serde(skip)]
    pub created: bool,
    #[serde(skip)]
    pub original: Option<WatchedFields>,
}

/// The columns compared against the last-synced snapshot to decide whether
/// an existing row needs an update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFields {
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
    pub total_embriones: i64,
    pub porcentaje_total_embriones: String,
    pub order: i64,
}

impl OpusRecord {
    /// A fresh, unpersisted row with every count at zero.
    pub fn blank(order: i64) -> Self {
        Self {
            id: None,
            production_id: None,
            order,
            donante_code: String::new(),
            race: String::new(),
            toro: None,
            toro_id: None,
            toro_name: None,
            gi: 0,
            gii: 0,
            giii: 0,
            otros: 0,
            viables: 0,
            total_oocitos: 0,
            ctv: 0,
            clivados: 0,
            prevision: 0,
            empaque: 0,
            vt_dt: 0,
            porcentaje_cliv: String::new(),
            porcentaje_prevision: String::new(),
            porcentaje_empaque: String::new(),
            porcentaje_vtdt: String::new(),
            total_embriones: 0,
            porcentaje_total_embriones: String::new(),
            is_existing: false,
            created: false,
            original: None,
        }
    }

    /// Marks a row fetched from the backend: persisted, with a snapshot
    /// taken. Rows without an order get `position + 1`.
    pub fn into_loaded(mut self, position: usize) -> Self {
        if self.order <= 0 {
            self.order = position as i64 + 1;
        }
        self.is_existing = true;
        self.created = self.id.is_some();
        self.original = Some(self.watched());
        self
    }

    /// Writes a raw form value into `field`. Numeric fields are coerced to
    /// integers (unparseable input becomes 0) and oocyte grades refresh the
    /// derived counts. Bull name resolution is left to the caller, which
    /// owns the bull list.
    pub fn set_field(&mut self, field: OpusField, raw: &str) {
        match field {
            OpusField::DonanteCode => self.donante_code = raw.to_string(),
            OpusField::Race => self.race = raw.to_string(),
            OpusField::ToroId => {
                let id = coerce_count(raw);
                self.toro_id = (id > 0).then_some(id);
            }
            OpusField::Gi => self.gi = coerce_count(raw),
            OpusField::Gii => self.gii = coerce_count(raw),
            OpusField::Giii => self.giii = coerce_count(raw),
            OpusField::Otros => self.otros = coerce_count(raw),
            OpusField::Ctv => self.ctv = coerce_count(raw),
            OpusField::Clivados => self.clivados = coerce_count(raw),
            OpusField::Prevision => self.prevision = coerce_count(raw),
            OpusField::Empaque => self.empaque = coerce_count(raw),
            OpusField::VtDt => self.vt_dt = coerce_count(raw),
            OpusField::Order => self.order = coerce_count(raw),
        }

        if field.is_oocyte_count() {
            self.recompute_counts();
        }
    }

    pub fn recompute_counts(&mut self) {
        self.viables = metrics::viables(self.gi, self.gii, self.giii);
        self.total_oocitos = metrics::total_oocitos(self.viables, self.otros);
    }

    pub fn yields(&self) -> YieldPercentages {
        YieldPercentages::compute(
            self.ctv,
            self.clivados,
            self.prevision,
            self.empaque,
            self.vt_dt,
        )
    }

    /// Stores the save-time percentages on the row itself.
    pub fn apply_yields(&mut self, yields: &YieldPercentages) {
        self.porcentaje_cliv = yields.porcentaje_cliv.clone();
        self.porcentaje_prevision = yields.porcentaje_prevision.clone();
        self.porcentaje_empaque = yields.porcentaje_empaque.clone();
        self.porcentaje_vtdt = yields.porcentaje_vtdt.clone();
        self.total_embriones = yields.total_embriones;
        self.porcentaje_total_embriones = yields.porcentaje_total_embriones.clone();
    }

    pub fn watched(&self) -> WatchedFields {
        WatchedFields {
            donante_code: self.donante_code.clone(),
            race: self.race.clone(),
            toro: self.toro.clone(),
            toro_id: self.toro_id,
            toro_name: self.toro_name.clone(),
            gi: self.gi,
            gii: self.gii,
            giii: self.giii,
            otros: self.otros,
            viables: self.viables,
            total_oocitos: self.total_oocitos,
            ctv: self.ctv,
            clivados: self.clivados,
            prevision: self.prevision,
            empaque: self.empaque,
            vt_dt: self.vt_dt,
            total_embriones: self.total_embriones,
            porcentaje_total_embriones: self.porcentaje_total_embriones.clone(),
            order: self.order,
        }
    }

    /// True when an existing row differs from its last-synced snapshot.
    /// An existing row without a snapshot is treated as changed.
    pub fn has_changes(&self) -> bool {
        match &self.original {
            Some(original) => *original != self.watched(),
            None => true,
        }
    }

    /// Whether removing this row needs an authoritative delete.
    pub fn is_persisted(&self) -> bool {
        self.created && self.id.is_some()
    }

    /// Adopts the backend's identity and snapshot after a create or update.
    pub fn mark_synced(&mut self, server: &OpusRecord) {
        if server.id.is_some() {
            self.id = server.id;
        }
        if server.production_id.is_some() {
            self.production_id = server.production_id;
        }
        self.is_existing = true;
        self.created = true;
        self.original = Some(server.watched());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_row() {
        let row = OpusRecord::blank(3);
        assert_eq!(row.order, 3);
        assert_eq!(row.total_oocitos, 0);
        assert!(!row.is_existing);
        assert!(!row.is_persisted());
    }

    #[test]
    fn test_set_field_recomputes_counts() {
        let mut row = OpusRecord::blank(1);
        row.set_field(OpusField::Gi, "2");
        row.set_field(OpusField::Gii, "8");
        row.set_field(OpusField::Giii, "8");
        row.set_field(OpusField::Otros, "2");
        assert_eq!(row.viables, 18);
        assert_eq!(row.total_oocitos, 20);

        row.set_field(OpusField::Gi, "");
        assert_eq!(row.viables, 16);
        assert_eq!(row.total_oocitos, 18);
    }

    #[test]
    fn test_set_field_huge_counts_saturate() {
        let mut row = OpusRecord::blank(1);
        row.set_field(OpusField::Gi, "1e19");
        row.set_field(OpusField::Gii, "1");
        row.set_field(OpusField::Otros, "3");
        assert_eq!(row.gi, i64::MAX);
        assert_eq!(row.viables, i64::MAX);
        assert_eq!(row.total_oocitos, i64::MAX);
        assert_eq!(row.yields().porcentaje_cliv, "0%");
    }

    #[test]
    fn test_set_field_downstream_counts_do_not_touch_oocytes() {
        let mut row = OpusRecord::blank(1);
        row.set_field(OpusField::Gi, "4");
        row.set_field(OpusField::Ctv, "15");
        row.set_field(OpusField::Clivados, "7");
        assert_eq!(row.viables, 4);
        assert_eq!(row.ctv, 15);
        assert_eq!(row.clivados, 7);
    }

    #[test]
    fn test_set_toro_id() {
        let mut row = OpusRecord::blank(1);
        row.set_field(OpusField::ToroId, "42");
        assert_eq!(row.toro_id, Some(42));
        row.set_field(OpusField::ToroId, "");
        assert_eq!(row.toro_id, None);
    }

    #[test]
    fn test_decode_backend_row() {
        let row: OpusRecord = serde_json::from_value(json!({
            "id": 11,
            "produccion_embrionaria_id": 4,
            "donante_code": "D-17",
            "race": "GYR",
            "toro_id": 3,
            "toro_name": "Titan",
            "gi": "2",
            "gii": 8,
            "giii": null,
            "otros": 1,
            "viables": 10,
            "total_oocitos": 11,
            "porcentaje_cliv": "40%"
        }))
        .unwrap();

        assert_eq!(row.id, Some(11));
        assert_eq!(row.production_id, Some(4));
        assert_eq!(row.gi, 2);
        assert_eq!(row.giii, 0);
        assert_eq!(row.order, 0);
        assert!(!row.is_existing);

        let loaded = row.into_loaded(4);
        assert_eq!(loaded.order, 5);
        assert!(loaded.is_existing);
        assert!(loaded.is_persisted());
        assert!(!loaded.has_changes());
    }

    #[test]
    fn test_change_detection_on_watched_fields() {
        let mut row = OpusRecord::blank(1);
        row.id = Some(1);
        let mut row = row.into_loaded(0);
        assert!(!row.has_changes());

        row.set_field(OpusField::DonanteCode, "D-2");
        assert!(row.has_changes());
        row.set_field(OpusField::DonanteCode, "");
        assert!(!row.has_changes());

        row.set_field(OpusField::Order, "9");
        assert!(row.has_changes());
    }

    #[test]
    fn test_percentage_fields_outside_watch_set() {
        let mut row = OpusRecord::blank(1);
        row.id = Some(1);
        let mut row = row.into_loaded(0);
        row.porcentaje_cliv = "80%".to_string();
        assert!(!row.has_changes());
    }

    #[test]
    fn test_mark_synced_adopts_server_identity() {
        let mut local = OpusRecord::blank(2);
        local.set_field(OpusField::Gi, "3");
        let mut server = local.clone();
        server.id = Some(77);
        server.production_id = Some(5);

        local.mark_synced(&server);
        assert_eq!(local.id, Some(77));
        assert_eq!(local.production_id, Some(5));
        assert!(local.is_existing);
        assert!(local.is_persisted());
        assert!(!local.has_changes());
    }

    #[test]
    fn test_lifecycle_flags_not_serialized() {
        let row = OpusRecord::blank(1).into_loaded(0);
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("is_existing").is_none());
        assert!(value.get("original").is_none());
        assert!(value.get("id").is_none());
    }
}
