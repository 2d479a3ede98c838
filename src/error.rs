//! Pipeline error types.
//!
//! # Error Handling Philosophy
//!
//! Errors should be:
//! 1. **Actionable**: Tell the caller what to do, not just what went wrong
//! 2. **Specific**: Include relevant context (provider name, status, body)
//! 3. **Local**: Every failure is scoped to one pipeline run; nothing is
//!    persisted or retried across runs
//!
//! A vision backend failure (unreachable, timed out, error status, malformed
//! or empty response) is recoverable only insofar as the fallback chain may
//! try the next backend. A missing credential aborts before any network call.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, SketchError>;

/// Errors that can occur while turning a sketch into a rendered image.
#[derive(Debug, Error)]
pub enum SketchError {
    /// No usable API key for the selected/available providers.
    #[error("No credential available for provider: {0}")]
    CredentialMissing(String),

    /// Error response from a remote API, with the raw body for debugging.
    #[error("API error: {0}")]
    ApiError(String),

    /// Backend answered successfully but produced no usable text.
    #[error("Vision backend '{0}' returned an empty description")]
    EmptyDescription(String),

    /// Network-level failure (connect, DNS, TLS).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Bounded request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Invalid configuration (bad provider name, malformed header, ...).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Feature not supported by this provider.
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl From<reqwest::Error> for SketchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SketchError::Timeout
        } else if err.is_connect() {
            SketchError::NetworkError(format!("Connection failed: {}", err))
        } else {
            SketchError::NetworkError(err.to_string())
        }
    }
}

impl SketchError {
    /// Whether the fallback chain should try the next backend after this error.
    ///
    /// Credential and configuration problems are permanent for the run;
    /// everything a remote backend can cause (timeout, error status, empty or
    /// malformed body) is worth one attempt against the next backend.
    pub fn triggers_fallback(&self) -> bool {
        !matches!(
            self,
            Self::CredentialMissing(_) | Self::ConfigError(_) | Self::InvalidRequest(_)
        )
    }

    /// User-friendly description with a suggested action.
    pub fn user_description(&self) -> String {
        match self {
            Self::CredentialMissing(provider) => format!(
                "No API key configured for '{}'. Set it in the environment or paste one for this session.",
                provider
            ),
            Self::ApiError(_) => {
                "The vision service returned an error. Check the key and try again.".to_string()
            }
            Self::EmptyDescription(provider) => format!(
                "'{}' could not describe the sketch. Try a clearer photo of the drawing.",
                provider
            ),
            Self::NetworkError(_) => {
                "Unable to reach the service. Check your internet connection.".to_string()
            }
            Self::Timeout => "The request timed out. The service may be overloaded.".to_string(),
            Self::SerializationError(_) => {
                "Failed to parse the service response. This may be temporary.".to_string()
            }
            Self::ConfigError(msg) => format!("Configuration error: {}.", msg),
            Self::InvalidRequest(msg) => format!("Invalid request: {}.", msg),
            Self::NotSupported(feature) => {
                format!("'{}' is not supported by this provider.", feature)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SketchError::ApiError("something went wrong".to_string());
        assert_eq!(error.to_string(), "API error: something went wrong");

        let error = SketchError::CredentialMissing("gemini".to_string());
        assert_eq!(
            error.to_string(),
            "No credential available for provider: gemini"
        );

        let error = SketchError::EmptyDescription("siliconflow".to_string());
        assert_eq!(
            error.to_string(),
            "Vision backend 'siliconflow' returned an empty description"
        );
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(SketchError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: SketchError = json_err.into();
        assert!(matches!(err, SketchError::SerializationError(_)));
    }

    #[test]
    fn test_triggers_fallback() {
        assert!(SketchError::Timeout.triggers_fallback());
        assert!(SketchError::ApiError("500".to_string()).triggers_fallback());
        assert!(SketchError::EmptyDescription("gemini".to_string()).triggers_fallback());
        assert!(SketchError::NetworkError("refused".to_string()).triggers_fallback());

        assert!(!SketchError::CredentialMissing("gemini".to_string()).triggers_fallback());
        assert!(!SketchError::ConfigError("bad url".to_string()).triggers_fallback());
        assert!(!SketchError::InvalidRequest("empty image".to_string()).triggers_fallback());
    }

    #[test]
    fn test_user_description_credential() {
        let desc = SketchError::CredentialMissing("gemini".to_string()).user_description();
        assert!(desc.contains("gemini"));
        assert!(desc.contains("API key"));
    }

    #[test]
    fn test_user_description_network() {
        let desc = SketchError::NetworkError("refused".to_string()).user_description();
        assert!(desc.contains("internet connection"));
    }

    #[test]
    fn test_user_description_empty() {
        let desc = SketchError::EmptyDescription("gemini".to_string()).user_description();
        assert!(desc.contains("gemini"));
    }
}
