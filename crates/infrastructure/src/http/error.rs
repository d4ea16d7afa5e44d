//! Turning failed HTTP exchanges into `DomainError`s.
//!
//! The backend reports failures as `{"detail": ...}` where `detail` is a
//! message string or a list of validation errors shaped like
//! `{"loc": ["body", "gi"], "msg": "...", "type": "..."}`.

use domain::DomainError;
use reqwest::StatusCode;
use serde_json::Value;

/// Operator-facing text from an error body, if it carries a `detail`.
pub fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(items) if !items.is_empty() => {
            let messages: Vec<String> = items.iter().map(describe_item).collect();
            Some(messages.join("; "))
        }
        Value::Object(_) => Some(body["detail"].to_string()),
        _ => None,
    }
}

fn describe_item(item: &Value) -> String {
    let Some(msg) = item.get("msg").and_then(Value::as_str) else {
        return match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    };

    let location: Vec<String> = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|loc| {
            loc.iter()
                .filter(|part| part.as_str() != Some("body"))
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    if location.is_empty() {
        msg.to_string()
    } else {
        format!("{}: {}", location.join("."), msg)
    }
}

/// Error for a non-success response with the given raw body.
pub fn from_response_body(status: StatusCode, body: &str) -> DomainError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(extract_detail)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

    DomainError::Remote {
        status: status.as_u16(),
        detail,
    }
}

/// Error for a request that never produced a response.
pub fn from_transport(err: reqwest::Error) -> DomainError {
    if err.is_decode() {
        DomainError::Decode(err.to_string())
    } else {
        DomainError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_detail() {
        let body = json!({"detail": "Cliente no encontrado"});
        assert_eq!(extract_detail(&body).as_deref(), Some("Cliente no encontrado"));
    }

    #[test]
    fn test_validation_list_detail() {
        let body = json!({"detail": [
            {"loc": ["body", "gi"], "msg": "value is not a valid integer", "type": "type_error.integer"},
            {"loc": ["body", "toro_id"], "msg": "field required", "type": "value_error.missing"}
        ]});
        assert_eq!(
            extract_detail(&body).as_deref(),
            Some("gi: value is not a valid integer; toro_id: field required")
        );
    }

    #[test]
    fn test_missing_or_blank_detail() {
        assert_eq!(extract_detail(&json!({"message": "x"})), None);
        assert_eq!(extract_detail(&json!({"detail": ""})), None);
        assert_eq!(extract_detail(&json!({"detail": []})), None);
    }

    #[test]
    fn test_body_fallback_to_status_message() {
        let err = from_response_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(
            err,
            DomainError::Remote {
                status: 502,
                detail: "Request failed with status code 502".to_string()
            }
        );

        let err = from_response_body(StatusCode::NOT_FOUND, r#"{"detail":"Input not found"}"#);
        assert_eq!(err.user_message(), "Input not found");
    }
}
