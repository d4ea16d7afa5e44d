use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::serde_util::{count, optional_count, optional_datetime, text};

/// Remark used when the operator leaves the field empty.
pub const REMARK_MANUAL: &str = "Sin comentario";
/// Remark for withdrawals recorded from a production batch.
pub const REMARK_AUTOMATIC: &str = "Registro automático";

/// A withdrawal request; paired with an increase of the input's usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSemenOutput {
    pub quantity_output: i64,
    pub output_date: NaiveDateTime,
    pub remark: String,
    pub produccion_embrionaria_id: Option<i64>,
}

/// An immutable withdrawal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemenOutput {
    pub id: i64,
    #[serde(deserialize_with = "count")]
    pub input_id: i64,
    #[serde(default, deserialize_with = "count")]
    pub quantity_output: i64,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub output_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "text")]
    pub remark: String,
    #[serde(default, deserialize_with = "optional_count")]
    pub produccion_embrionaria_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_output_with_offset_timestamp() {
        let output: SemenOutput = serde_json::from_value(json!({
            "id": 3,
            "input_id": 9,
            "quantity_output": 2,
            "output_date": "2024-07-01T10:15:00Z",
            "remark": "Sin comentario",
            "produccion_embrionaria_id": null
        }))
        .unwrap();

        assert_eq!(output.input_id, 9);
        assert_eq!(
            output.output_date.unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2024-07-01 10:15"
        );
        assert_eq!(output.produccion_embrionaria_id, None);
    }

    #[test]
    fn test_new_output_serializes_naive_timestamp() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let value = serde_json::to_value(NewSemenOutput {
            quantity_output: 3,
            output_date: date,
            remark: REMARK_MANUAL.to_string(),
            produccion_embrionaria_id: Some(4),
        })
        .unwrap();
        assert_eq!(value["output_date"], "2024-07-01T09:00:00");
        assert_eq!(value["produccion_embrionaria_id"], 4);
    }
}
