//! Error types for screening operations

use thiserror::Error;

/// Screening specific errors
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// No API key configured and none supplied with the call
    #[error(
        "API key is required. Set EODHD_API_KEY environment variable or pass apiKey parameter."
    )]
    MissingApiKey,

    /// Provider answered with a non-success HTTP status
    #[error("EODHD API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A fundamentals or technical constraint is malformed
    #[error("Invalid constraint for {field}: {reason}")]
    InvalidConstraint { field: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for screening operations
pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Convert ScreenerError to eodhd_core::Error
impl From<ScreenerError> for eodhd_core::Error {
    fn from(err: ScreenerError) -> Self {
        match err {
            ScreenerError::InvalidConstraint { .. } => {
                eodhd_core::Error::InvalidParameters(err.to_string())
            }
            _ => eodhd_core::Error::ProcessingFailed(err.to_string()),
        }
    }
}

impl From<eodhd_utils::EnvError> for ScreenerError {
    fn from(err: eodhd_utils::EnvError) -> Self {
        ScreenerError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ScreenerError::MissingApiKey.to_string(),
            "API key is required. Set EODHD_API_KEY environment variable or pass apiKey parameter."
        );

        let err = ScreenerError::Api {
            status: 401,
            body: "Unauthenticated".to_string(),
        };
        assert_eq!(err.to_string(), "EODHD API error (401): Unauthenticated");
    }

    #[test]
    fn test_error_conversion() {
        let core_err: eodhd_core::Error = ScreenerError::MissingApiKey.into();
        match core_err {
            eodhd_core::Error::ProcessingFailed(msg) => {
                assert!(msg.contains("EODHD_API_KEY"));
            }
            _ => panic!("Expected ProcessingFailed variant"),
        }

        let core_err: eodhd_core::Error = ScreenerError::InvalidConstraint {
            field: "Highlights.PERatio".to_string(),
            reason: "no bound".to_string(),
        }
        .into();
        assert!(matches!(core_err, eodhd_core::Error::InvalidParameters(_)));
    }
}
