//! Provider chain construction.
//!
//! Turns a set of credentials and a backend choice into the ordered list of
//! vision providers the pipeline will try. Auto mode yields every backend a
//! credential exists for, Gemini first; an explicit choice yields exactly one
//! backend and disables cross-backend fallback.

use std::sync::Arc;
use tracing::debug;

use crate::config::{Credentials, ProviderChoice};
use crate::error::{Result, SketchError};
use crate::providers::{GeminiVision, OpenAICompatibleVision};
use crate::traits::VisionProvider;

/// Builds provider chains from credentials.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Build the ordered provider chain for the given choice.
    ///
    /// Fails fast with [`SketchError::CredentialMissing`] when the choice
    /// cannot be satisfied; no network traffic happens here.
    pub fn chain(
        credentials: &Credentials,
        choice: ProviderChoice,
    ) -> Result<Vec<Arc<dyn VisionProvider>>> {
        let mut chain: Vec<Arc<dyn VisionProvider>> = Vec::new();

        match choice {
            ProviderChoice::Auto => {
                if let Some(key) = &credentials.gemini_api_key {
                    chain.push(Arc::new(GeminiVision::new(key.clone())?));
                }
                if let Some(key) = &credentials.silicon_api_key {
                    chain.push(Arc::new(OpenAICompatibleVision::new(key.clone())?));
                }
                if chain.is_empty() {
                    return Err(SketchError::CredentialMissing(
                        "no API key configured for any backend".to_string(),
                    ));
                }
            }
            ProviderChoice::Gemini => {
                let key = credentials
                    .gemini_api_key
                    .as_ref()
                    .ok_or_else(|| SketchError::CredentialMissing("gemini".to_string()))?;
                chain.push(Arc::new(GeminiVision::new(key.clone())?));
            }
            ProviderChoice::SiliconFlow => {
                let key = credentials
                    .silicon_api_key
                    .as_ref()
                    .ok_or_else(|| SketchError::CredentialMissing("siliconflow".to_string()))?;
                chain.push(Arc::new(OpenAICompatibleVision::new(key.clone())?));
            }
        }

        debug!(
            providers = ?chain.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "Built provider chain"
        );
        Ok(chain)
    }

    /// Build the chain from environment variables.
    pub fn chain_from_env(choice: ProviderChoice) -> Result<Vec<Arc<dyn VisionProvider>>> {
        Self::chain(&Credentials::from_env(), choice)
    }
}
