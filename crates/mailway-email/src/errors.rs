//! Error types for the mail dispatch service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Unsupported email provider: {0}")]
    UnsupportedProvider(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Connection verification failed: {0}")]
    Verification(String),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("{stage} timed out after {secs}s")]
    Timeout { stage: &'static str, secs: u64 },
}

impl EmailError {
    /// The raw failure text surfaced to API clients in the `error` field.
    ///
    /// Transport-layer errors pass their text through unchanged; the
    /// frontend displays provider error messages verbatim.
    pub fn detail(&self) -> String {
        match self {
            EmailError::Validation(errors) => errors.join("; "),
            EmailError::Transport(detail)
            | EmailError::Verification(detail)
            | EmailError::Dispatch(detail) => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_passes_transport_text_through() {
        let err = EmailError::Verification("535 Authentication failed".to_string());
        assert_eq!(err.detail(), "535 Authentication failed");
        assert_eq!(
            err.to_string(),
            "Connection verification failed: 535 Authentication failed"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = EmailError::Timeout {
            stage: "dispatch",
            secs: 30,
        };
        assert_eq!(err.to_string(), "dispatch timed out after 30s");
        assert_eq!(err.detail(), "dispatch timed out after 30s");
    }

    #[test]
    fn test_validation_detail_joins_messages() {
        let err = EmailError::Validation(vec!["to is required".into(), "subject is required".into()]);
        assert_eq!(err.detail(), "to is required; subject is required");
    }
}
