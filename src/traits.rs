//! Vision provider trait and the multimodal sketch payload.
//!
//! # Trait-Based Provider Abstraction
//!
//! Using a trait instead of concrete types enables:
//! - **Testing**: MockVision for unit and e2e tests (no API calls)
//! - **Flexibility**: Swap backends without touching pipeline code
//! - **Resilience**: Fallback to a secondary backend when the primary fails
//!
//! Each provider converts [`SketchImage`] to its own wire format: Gemini
//! attaches the base64 payload as inline data, OpenAI-compatible endpoints
//! embed it as a `data:` URI inside a JSON chat message.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};

/// An uploaded sketch, held in memory for the duration of one pipeline run.
///
/// The raw bytes are stored base64-encoded because both supported transports
/// want base64; nothing in the pipeline needs the decoded form back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SketchImage {
    /// Base64-encoded image data (without data: URI prefix).
    pub data: String,

    /// MIME type of the image (e.g., "image/png", "image/jpeg").
    pub mime_type: String,
}

impl SketchImage {
    /// Create a sketch payload from raw uploaded bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Create from data that is already base64-encoded.
    pub fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Render as a data URI (OpenAI-compatible vision format).
    ///
    /// Returns: `data:image/jpeg;base64,/9j/4AAQ...`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Check against the upload formats the UI accepts (jpg/png/jpeg).
    pub fn is_supported_mime(&self) -> bool {
        matches!(self.mime_type.as_str(), "image/png" | "image/jpeg")
    }

    /// Reject payloads that cannot possibly describe anything.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(SketchError::InvalidRequest(
                "uploaded image is empty".to_string(),
            ));
        }
        if !self.is_supported_mime() {
            return Err(SketchError::InvalidRequest(format!(
                "unsupported image type '{}', expected jpg or png",
                self.mime_type
            )));
        }
        Ok(())
    }
}

/// Trait for vision-language backends that can describe a sketch.
///
/// The contract of [`describe`](VisionProvider::describe): send the image and
/// instruction to the backend and return its text verbatim (trimmed only, no
/// parsing or cleanup). Any transport error, non-success status, structural
/// mismatch in the response, or empty text is a [`SketchError`] — a raw
/// transport exception must never escape to the caller.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Stable provider identifier ("gemini", "siliconflow", "mock").
    fn name(&self) -> &str;

    /// The model the next call will use.
    fn model(&self) -> &str;

    /// Describe the sketch according to the instruction text.
    async fn describe(&self, image: &SketchImage, instruction: &str) -> Result<String>;

    /// Whether this provider can also generate the short comic-mode story.
    fn supports_narration(&self) -> bool {
        false
    }

    /// Generate a short narrative from a descriptive prompt (text-only call).
    ///
    /// Best-effort bonus feature: callers swallow failures here, so the
    /// default implementation simply reports lack of support.
    async fn narrate(&self, _instruction: &str) -> Result<String> {
        Err(SketchError::NotSupported("narration".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sketch_image_from_bytes() {
        let image = SketchImage::from_bytes(b"hello", "image/png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "aGVsbG8=");
    }

    #[test]
    fn test_sketch_image_to_data_uri() {
        let image = SketchImage::from_base64("base64data", "image/jpeg");
        assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,base64data");
    }

    #[test]
    fn test_supported_mime() {
        assert!(SketchImage::from_base64("x", "image/png").is_supported_mime());
        assert!(SketchImage::from_base64("x", "image/jpeg").is_supported_mime());
        assert!(!SketchImage::from_base64("x", "image/gif").is_supported_mime());
        assert!(!SketchImage::from_base64("x", "text/plain").is_supported_mime());
    }

    #[test]
    fn test_validate_empty_rejected() {
        let image = SketchImage::from_base64("", "image/png");
        assert!(matches!(
            image.validate(),
            Err(SketchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_bad_mime_rejected() {
        let image = SketchImage::from_bytes(b"gif stuff", "image/gif");
        assert!(matches!(
            image.validate(),
            Err(SketchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_ok() {
        let image = SketchImage::from_bytes(b"png stuff", "image/png");
        assert!(image.validate().is_ok());
    }

    #[test]
    fn test_sketch_image_equality() {
        let a = SketchImage::from_bytes(b"data", "image/png");
        let b = SketchImage::from_bytes(b"data", "image/png");
        assert_eq!(a, b);

        let c = SketchImage::from_bytes(b"data", "image/jpeg");
        assert_ne!(a, c);
    }
}
