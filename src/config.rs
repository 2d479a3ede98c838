//! Credential sourcing and provider selection.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY`: key for the Gemini vision backend
//! - `SILICONFLOW_API_KEY`: key for the SiliconFlow (OpenAI-compatible) backend
//!
//! Keys live in process memory for the session only and are never written
//! anywhere. A UI may also collect a single pasted key and let
//! [`Credentials::from_pasted_key`] sort it to the right provider by shape.

use crate::error::{Result, SketchError};

/// Session-scoped API keys, one slot per vision backend.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Gemini API key, if configured.
    pub gemini_api_key: Option<String>,
    /// SiliconFlow API key, if configured.
    pub silicon_api_key: Option<String>,
}

impl Credentials {
    /// Load keys from the environment. Absent or empty variables leave the
    /// slot unset; the factory decides later whether that is fatal.
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: read_env("GEMINI_API_KEY"),
            silicon_api_key: read_env("SILICONFLOW_API_KEY"),
        }
    }

    /// Classify a single pasted key by its shape.
    ///
    /// Google AI keys start with `AIza`, SiliconFlow keys with `sk-`. Anything
    /// else yields empty credentials and will fail fast at chain-building time.
    pub fn from_pasted_key(key: &str) -> Self {
        let key = key.trim();
        let mut credentials = Self::default();
        if key.starts_with("AIza") {
            credentials.gemini_api_key = Some(key.to_string());
        } else if key.starts_with("sk-") {
            credentials.silicon_api_key = Some(key.to_string());
        }
        credentials
    }

    /// Whether any backend is usable at all.
    pub fn has_any(&self) -> bool {
        self.gemini_api_key.is_some() || self.silicon_api_key.is_some()
    }
}

fn read_env(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// How the user wants the vision backend chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderChoice {
    /// Try Gemini first, fall back to SiliconFlow (original behavior).
    #[default]
    Auto,
    /// Strict: Gemini only, no fallback.
    Gemini,
    /// Strict: SiliconFlow only, no fallback.
    SiliconFlow,
}

impl ProviderChoice {
    /// Parse a provider name (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gemini" | "google" => Ok(Self::Gemini),
            "siliconflow" | "silicon" => Ok(Self::SiliconFlow),
            other => Err(SketchError::ConfigError(format!(
                "unknown provider '{}'. Valid options: auto, gemini, siliconflow",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credentials_empty() {
        let credentials = Credentials::default();
        assert!(!credentials.has_any());
    }

    #[test]
    fn test_pasted_gemini_key() {
        let credentials = Credentials::from_pasted_key("AIzaSyFakeKey123");
        assert_eq!(
            credentials.gemini_api_key.as_deref(),
            Some("AIzaSyFakeKey123")
        );
        assert!(credentials.silicon_api_key.is_none());
    }

    #[test]
    fn test_pasted_silicon_key() {
        let credentials = Credentials::from_pasted_key("  sk-fake-key  ");
        assert_eq!(credentials.silicon_api_key.as_deref(), Some("sk-fake-key"));
        assert!(credentials.gemini_api_key.is_none());
    }

    #[test]
    fn test_pasted_unrecognized_key() {
        let credentials = Credentials::from_pasted_key("hunter2");
        assert!(!credentials.has_any());
    }

    #[test]
    fn test_provider_choice_parse() {
        assert_eq!(ProviderChoice::parse("auto").unwrap(), ProviderChoice::Auto);
        assert_eq!(
            ProviderChoice::parse("GEMINI").unwrap(),
            ProviderChoice::Gemini
        );
        assert_eq!(
            ProviderChoice::parse("siliconflow").unwrap(),
            ProviderChoice::SiliconFlow
        );
        assert_eq!(
            ProviderChoice::parse("silicon").unwrap(),
            ProviderChoice::SiliconFlow
        );
        assert!(ProviderChoice::parse("openai").is_err());
    }

    #[test]
    fn test_provider_choice_default_is_auto() {
        assert_eq!(ProviderChoice::default(), ProviderChoice::Auto);
    }
}
