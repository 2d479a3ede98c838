//! Gemini vision provider (backend A).
//!
//! Sends the sketch as inline binary data alongside the instruction text to
//! the Google AI `generateContent` endpoint. Before declaring the backend
//! failed, a second attempt is made against the pro model tier with the same
//! payload; only then does the failure surface to the fallback chain.
//!
//! # Environment Variables
//! - `GEMINI_API_KEY`: API key for the Google AI Gemini API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{Result, SketchError};
use crate::traits::{SketchImage, VisionProvider};

/// Gemini API endpoint.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Primary and fallback model tiers.
const PRIMARY_MODEL: &str = "gemini-1.5-flash";
const FALLBACK_MODEL: &str = "gemini-1.5-pro";

/// Bounded per-request timeout (seconds).
const REQUEST_TIMEOUT_SECS: u64 = 40;

/// Near-deterministic sampling keeps the description faithful to the sketch.
const TEMPERATURE: f32 = 0.1;
const MAX_OUTPUT_TOKENS: usize = 1024;

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================
//
// Images travel as inline_data parts:
//
//   parts: [
//     { text: "..." },
//     { inlineData: { mimeType: "...", data: "base64..." } }
//   ]

/// Blob for inline media data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

/// Content part: text or inline image data.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

/// Deserialized response part. Only the text field matters here.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiError {
    code: i32,
    message: String,
}

// ============================================================================
// GeminiVision Implementation
// ============================================================================

/// Gemini vision backend.
#[derive(Debug)]
pub struct GeminiVision {
    client: Client,
    api_key: String,
    model: String,
    fallback_model: Option<String>,
}

impl GeminiVision {
    /// Create a provider using a Google AI API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SketchError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: PRIMARY_MODEL.to_string(),
            fallback_model: Some(FALLBACK_MODEL.to_string()),
        })
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Err(SketchError::CredentialMissing("gemini".to_string())),
        }
    }

    /// Override the primary model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override or disable the internal model-tier fallback.
    pub fn with_fallback_model(mut self, model: Option<String>) -> Self {
        self.fallback_model = model;
        self
    }

    fn build_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, model, self.api_key
        )
    }

    /// Send a generateContent request and extract the first candidate's text.
    async fn generate(&self, model: &str, request: &GenerateContentRequest) -> Result<String> {
        let url = self.build_url(model);
        debug!(model = model, "Sending Gemini generateContent request");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SketchError::ApiError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&text) {
                return Err(SketchError::ApiError(format!(
                    "Gemini API error ({}): {}",
                    error_response.error.code, error_response.error.message
                )));
            }
            return Err(SketchError::ApiError(format!(
                "Gemini API error ({}): {}",
                status, text
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            SketchError::ApiError(format!("Failed to parse response: {}. Body: {}", e, text))
        })?;

        let candidates = parsed
            .candidates
            .ok_or_else(|| SketchError::ApiError("No candidates in response".to_string()))?;
        let candidate = candidates
            .first()
            .ok_or_else(|| SketchError::ApiError("Empty candidates array".to_string()))?;

        let content: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(SketchError::EmptyDescription("gemini".to_string()));
        }
        Ok(content)
    }

    /// Run the request against the primary tier, then the fallback tier.
    async fn generate_with_tier_fallback(&self, request: &GenerateContentRequest) -> Result<String> {
        match self.generate(&self.model, request).await {
            Ok(text) => Ok(text),
            Err(primary_err) => {
                let Some(fallback) = &self.fallback_model else {
                    return Err(primary_err);
                };
                warn!(
                    primary = %self.model,
                    fallback = %fallback,
                    error = %primary_err,
                    "Primary Gemini tier failed, retrying on fallback tier"
                );
                self.generate(fallback, request).await
            }
        }
    }
}

#[async_trait]
impl VisionProvider for GeminiVision {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, image, instruction), fields(model = %self.model))]
    async fn describe(&self, image: &SketchImage, instruction: &str) -> Result<String> {
        image.validate()?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(instruction.to_string()),
                        ..Default::default()
                    },
                    Part {
                        inline_data: Some(Blob {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        }),
                        ..Default::default()
                    },
                ],
                role: Some("user".to_string()),
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                temperature: Some(TEMPERATURE),
            }),
        };

        self.generate_with_tier_fallback(&request).await
    }

    fn supports_narration(&self) -> bool {
        true
    }

    #[instrument(skip(self, instruction), fields(model = %self.model))]
    async fn narrate(&self, instruction: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(instruction.to_string()),
                    ..Default::default()
                }],
                role: Some("user".to_string()),
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                temperature: Some(0.7),
            }),
        };

        self.generate_with_tier_fallback(&request).await
    }
}
