use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::DomainError;
use crate::serde_util::{count, optional_count, optional_date, optional_text};

/// One received lot of straws for a bull, owned by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemenInput {
    pub id: i64,
    #[serde(default, deserialize_with = "optional_count")]
    pub bull_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_count")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "count")]
    pub quantity_received: i64,
    #[serde(default, deserialize_with = "count")]
    pub quantity_taken: i64,
    /// Balance as reported by the backend, when it sends one.
    #[serde(default, deserialize_with = "optional_count", skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<i64>,
    /// Older endpoints report the balance as `total`.
    #[serde(default, deserialize_with = "optional_count", skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub bull_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub lote: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub fecha: Option<NaiveDate>,
}

impl SemenInput {
    pub fn new(id: i64, bull_id: i64, user_id: i64, quantity_received: i64) -> Self {
        Self {
            id,
            bull_id: Some(bull_id),
            user_id: Some(user_id),
            quantity_received,
            quantity_taken: 0,
            quantity_available: None,
            total: None,
            bull_name: None,
            lote: None,
            fecha: None,
        }
    }

    /// Straws left in the lot. Prefers the backend's own figure.
    pub fn available(&self) -> i64 {
        self.quantity_available
            .or(self.total)
            .unwrap_or(self.quantity_received.saturating_sub(self.quantity_taken))
    }

    /// Checks a new cumulative usage and returns how many straws it withdraws.
    pub fn withdrawal_delta(&self, new_quantity_taken: i64) -> Result<i64, DomainError> {
        if new_quantity_taken < self.quantity_taken {
            return Err(DomainError::validation(
                "No puedes reducir la cantidad utilizada",
            ));
        }
        if new_quantity_taken > self.quantity_received {
            return Err(DomainError::validation(format!(
                "No puedes tomar más de {} unidades",
                self.quantity_received
            )));
        }
        Ok(new_quantity_taken.saturating_sub(self.quantity_taken))
    }

    /// Local bookkeeping for a new cumulative usage; the backend balance is
    /// replaced by the derived one.
    pub fn apply_taken(&mut self, new_quantity_taken: i64) {
        self.quantity_taken = new_quantity_taken;
        self.quantity_available = Some(self.quantity_received.saturating_sub(new_quantity_taken));
        self.total = None;
    }

    pub fn display_bull(&self) -> &str {
        self.bull_name.as_deref().unwrap_or("Sin nombre")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_available_prefers_server_figure() {
        let mut input = SemenInput::new(1, 2, 3, 20);
        input.quantity_taken = 5;
        assert_eq!(input.available(), 15);

        input.total = Some(14);
        assert_eq!(input.available(), 14);

        input.quantity_available = Some(13);
        assert_eq!(input.available(), 13);
    }

    #[test]
    fn test_withdrawal_bounds() {
        let mut input = SemenInput::new(1, 2, 3, 20);
        input.quantity_taken = 5;

        assert_eq!(input.withdrawal_delta(8).unwrap(), 3);
        assert_eq!(input.withdrawal_delta(5).unwrap(), 0);
        assert_eq!(input.withdrawal_delta(20).unwrap(), 15);

        assert_eq!(
            input.withdrawal_delta(4).unwrap_err(),
            DomainError::Validation("No puedes reducir la cantidad utilizada".to_string())
        );
        assert_eq!(
            input.withdrawal_delta(21).unwrap_err().to_string(),
            "No puedes tomar más de 20 unidades"
        );
    }

    #[test]
    fn test_apply_taken_overrides_server_balance() {
        let mut input = SemenInput::new(1, 2, 3, 20);
        input.total = Some(20);
        input.apply_taken(8);
        assert_eq!(input.quantity_taken, 8);
        assert_eq!(input.available(), 12);
    }

    #[test]
    fn test_decode_with_missing_fields() {
        let input: SemenInput = serde_json::from_value(json!({
            "id": 7,
            "bull_id": "4",
            "quantity_received": 10,
            "quantity_taken": null,
            "total": 10
        }))
        .unwrap();
        assert_eq!(input.bull_id, Some(4));
        assert_eq!(input.quantity_taken, 0);
        assert_eq!(input.available(), 10);
        assert_eq!(input.display_bull(), "Sin nombre");
    }
}
