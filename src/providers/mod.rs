//! Vision backend implementations.
//!
//! Each backend implements [`crate::traits::VisionProvider`] over its own
//! wire format: Gemini uses inline-data parts, SiliconFlow (and any other
//! OpenAI-compatible gateway) uses image_url content parts. The mock backend
//! exists for tests that exercise fallback and pipeline behavior without
//! network access.

pub mod gemini;
pub mod mock;
pub mod openai_compatible;

pub use gemini::GeminiVision;
pub use mock::MockVision;
pub use openai_compatible::OpenAICompatibleVision;
