//! Result assembly.
//!
//! The presenter takes a finished render and packages everything the caller
//! needs: the render URL, the descriptive prompt that produced it, the image
//! bytes when the download succeeds, and in comic mode a short narrated
//! story. Download and narration are best-effort; their failure never
//! invalidates the render itself.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::Mode;
use crate::error::{Result, SketchError};
use crate::prompt::build_story_instruction;
use crate::render::{fetch_image_bytes, RenderRequest};
use crate::traits::VisionProvider;

/// The finished output of a pipeline run.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Render URL, usable directly in an `<img>` tag or browser.
    pub image_url: String,
    /// The descriptive prompt the vision backend produced.
    pub prompt_text: String,
    /// Downloaded image bytes, when the fetch succeeded.
    pub image_bytes: Option<Vec<u8>>,
    /// Narrated story, comic mode only and only when narration succeeded.
    pub story: Option<String>,
}

/// Assembles presentations from render requests.
pub struct Presenter {
    client: reqwest::Client,
    download: bool,
}

impl Presenter {
    pub fn new() -> Result<Self> {
        // No timeout here: image generation on the render endpoint can take
        // well over a minute and the fetch blocks until it finishes.
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SketchError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            download: true,
        })
    }

    /// Skip the image download and present the URL only.
    pub fn without_download(mut self) -> Self {
        self.download = false;
        self
    }

    /// Assemble the presentation for a finished render.
    ///
    /// `narrator` supplies the comic-mode story; it is ignored in single-image
    /// mode and when the provider does not support narration.
    pub async fn present(
        &self,
        request: &RenderRequest,
        mode: Mode,
        narrator: Option<&Arc<dyn VisionProvider>>,
    ) -> Presentation {
        let image_url = request.url();

        let image_bytes = if self.download {
            match fetch_image_bytes(&self.client, &image_url).await {
                Ok(bytes) => {
                    debug!(size = bytes.len(), "Downloaded rendered image");
                    Some(bytes)
                }
                Err(e) => {
                    warn!(error = %e, "Image download failed, presenting URL only");
                    None
                }
            }
        } else {
            None
        };

        let story = match (mode, narrator) {
            (Mode::ComicStrip, Some(provider)) if provider.supports_narration() => {
                let instruction = build_story_instruction(request.prompt());
                match provider.narrate(&instruction).await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        warn!(provider = provider.name(), error = %e, "Story narration failed");
                        None
                    }
                }
            }
            _ => None,
        };

        Presentation {
            image_url,
            prompt_text: request.prompt().to_string(),
            image_bytes,
            story,
        }
    }
}
