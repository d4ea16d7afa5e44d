use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Rejected before any request is made. Displays the bare message so it
    /// can be shown to the operator as-is.
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with an error status. `detail` is the server's
    /// `detail` field when present, otherwise the transport message.
    #[error("Server error {status}: {detail}")]
    Remote { status: u16, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Text suitable for an operator-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Remote { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_raw_message() {
        let err = DomainError::validation("No puedes reducir la cantidad utilizada");
        assert_eq!(err.to_string(), "No puedes reducir la cantidad utilizada");
        assert!(err.is_validation());
    }

    #[test]
    fn test_user_message_prefers_server_detail() {
        let err = DomainError::Remote {
            status: 422,
            detail: "order ya existe".to_string(),
        };
        assert_eq!(err.user_message(), "order ya existe");
        assert_eq!(err.to_string(), "Server error 422: order ya existe");
    }

    #[test]
    fn test_user_message_falls_back_to_display() {
        let err = DomainError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), "Network error: connection refused");
    }
}
