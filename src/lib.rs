//! DreamCanvas - Sketch-to-Image Pipeline
//!
//! Turns a child's sketch into a polished AI-rendered image. A vision
//! backend studies the uploaded drawing and writes a faithful English
//! description of it; that description becomes the prompt for the
//! Pollinations flux endpoint, which renders the final artwork. In comic
//! mode the same backend also narrates a short bedtime story to go with
//! the four-panel strip.
//!
//! # Backends
//!
//! | Backend | Vision | Narration | Notes |
//! |---------|--------|-----------|-------|
//! | Gemini | ✓ | ✓ | flash tier with internal pro fallback |
//! | SiliconFlow | ✓ | ✓ | Qwen2-VL via OpenAI-compatible API |
//! | Mock | ✓ | ✓ | Testing (no API calls) |
//!
//! In auto mode the pipeline tries Gemini first and falls back to
//! SiliconFlow on retryable failures. Picking a backend explicitly
//! disables cross-backend fallback.
//!
//! # Example
//!
//! ```ignore
//! use dreamcanvas::{Mode, Pipeline, ProviderChoice, SketchImage, Style};
//!
//! let pipeline = Pipeline::from_env(ProviderChoice::Auto)?;
//! let sketch = SketchImage::from_bytes(&png_bytes, "image/png");
//! let result = pipeline.run(&sketch, Mode::SingleImage, Style::PixarFilm).await?;
//! println!("{}", result.image_url);
//! ```
//!
//! # See Also
//!
//! - [`crate::traits`] for the vision backend trait
//! - [`crate::providers`] for concrete backends
//! - [`crate::prompt`] for the instruction templates

pub mod catalog;
pub mod config;
pub mod error;
pub mod factory;
pub mod pipeline;
pub mod present;
pub mod prompt;
pub mod providers;
pub mod render;
pub mod traits;

pub use catalog::{Mode, Style};
pub use config::{Credentials, ProviderChoice};
pub use error::{Result, SketchError};
pub use factory::ProviderFactory;
pub use pipeline::Pipeline;
pub use present::{Presentation, Presenter};
pub use prompt::{build_instruction, build_story_instruction};
pub use providers::gemini::GeminiVision;
pub use providers::mock::MockVision;
pub use providers::openai_compatible::OpenAICompatibleVision;
pub use render::{fetch_image_bytes, RenderRequest, IMAGE_HEIGHT, IMAGE_MODEL, IMAGE_WIDTH, SEED_RANGE};
pub use traits::{SketchImage, VisionProvider};
