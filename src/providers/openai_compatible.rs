//! OpenAI-compatible vision provider (backend B).
//!
//! Talks to any `/chat/completions` endpoint that accepts multimodal user
//! messages with `image_url` content parts. Defaults target SiliconFlow's
//! hosted Qwen2-VL model; the base URL and model are overridable so other
//! compatible gateways work too.
//!
//! # Environment Variables
//! - `SILICONFLOW_API_KEY`: Bearer token for the SiliconFlow API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{Result, SketchError};
use crate::traits::{SketchImage, VisionProvider};

/// SiliconFlow API defaults.
const SILICONFLOW_API_BASE: &str = "https://api.siliconflow.cn/v1";
const DEFAULT_MODEL: &str = "Qwen/Qwen2-VL-72B-Instruct";

/// Bounded per-request timeout (seconds).
const REQUEST_TIMEOUT_SECS: u64 = 40;

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: usize = 1024;

// ============================================================================
// OpenAI-Compatible API Request/Response Types
// ============================================================================
//
// Vision messages use the content-parts form:
//
//   content: [
//     { "type": "text", "text": "..." },
//     { "type": "image_url", "image_url": { "url": "data:image/png;base64,..." } }
//   ]
//
// Plain-text messages use the string form. The untagged union covers both.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrlContent },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImageUrlContent {
    url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

// ============================================================================
// OpenAICompatibleVision Implementation
// ============================================================================

/// Vision backend for OpenAI-compatible chat-completions APIs.
#[derive(Debug)]
pub struct OpenAICompatibleVision {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAICompatibleVision {
    /// Create a provider with SiliconFlow defaults.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SketchError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: SILICONFLOW_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a provider from the `SILICONFLOW_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("SILICONFLOW_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Err(SketchError::CredentialMissing("siliconflow".to_string())),
        }
    }

    /// Point at a different OpenAI-compatible gateway.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send a chat request and extract the first choice's content.
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, url = %url, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SketchError::ApiError(format!(
                "Chat completion failed ({}): {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SketchError::ApiError(format!("Failed to parse response: {}", e)))?;

        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(SketchError::EmptyDescription(self.model.clone()));
        }
        Ok(content)
    }
}

#[async_trait]
impl VisionProvider for OpenAICompatibleVision {
    fn name(&self) -> &str {
        "siliconflow"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, image, instruction), fields(model = %self.model))]
    async fn describe(&self, image: &SketchImage, instruction: &str) -> Result<String> {
        image.validate()?;

        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: instruction.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrlContent {
                        url: image.to_data_uri(),
                    },
                },
            ]),
        }];

        self.chat(messages).await
    }

    fn supports_narration(&self) -> bool {
        true
    }

    #[instrument(skip(self, instruction), fields(model = %self.model))]
    async fn narrate(&self, instruction: &str) -> Result<String> {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Text(instruction.to_string()),
        }];

        self.chat(messages).await
    }
}
