//! End-to-end sketch pipeline.
//!
//! One call runs the whole flow: validate the sketch, build the instruction
//! for the chosen mode and style, ask each backend in the chain for a
//! descriptive prompt until one succeeds, turn that prompt into a render
//! request, and hand it to the presenter.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::catalog::{Mode, Style};
use crate::config::{Credentials, ProviderChoice};
use crate::error::{Result, SketchError};
use crate::factory::ProviderFactory;
use crate::present::{Presentation, Presenter};
use crate::prompt::build_instruction;
use crate::render::RenderRequest;
use crate::traits::{SketchImage, VisionProvider};

/// Drives a sketch from upload to presentation.
pub struct Pipeline {
    chain: Vec<Arc<dyn VisionProvider>>,
    presenter: Presenter,
}

impl Pipeline {
    /// Build a pipeline over an explicit provider chain.
    pub fn new(chain: Vec<Arc<dyn VisionProvider>>) -> Result<Self> {
        if chain.is_empty() {
            return Err(SketchError::ConfigError(
                "Provider chain is empty".to_string(),
            ));
        }
        Ok(Self {
            chain,
            presenter: Presenter::new()?,
        })
    }

    /// Build a pipeline from credentials and a backend choice.
    pub fn from_credentials(credentials: &Credentials, choice: ProviderChoice) -> Result<Self> {
        Self::new(ProviderFactory::chain(credentials, choice)?)
    }

    /// Build a pipeline from environment variables.
    pub fn from_env(choice: ProviderChoice) -> Result<Self> {
        Self::new(ProviderFactory::chain_from_env(choice)?)
    }

    /// Present the render URL without downloading the image bytes.
    pub fn without_download(mut self) -> Self {
        self.presenter = self.presenter.without_download();
        self
    }

    /// Names of the backends in fallback order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.chain.iter().map(|p| p.name()).collect()
    }

    /// Ask each backend in order until one produces a description.
    ///
    /// Returns the description together with the provider that produced it,
    /// so narration later runs on the same backend. When every backend
    /// fails, the last error surfaces.
    async fn describe(
        &self,
        image: &SketchImage,
        instruction: &str,
    ) -> Result<(String, Arc<dyn VisionProvider>)> {
        let mut last_error = None;

        for provider in &self.chain {
            info!(provider = provider.name(), model = provider.model(), "Describing sketch");
            match provider.describe(image, instruction).await {
                Ok(text) => return Ok((text, Arc::clone(provider))),
                Err(e) if e.triggers_fallback() => {
                    warn!(provider = provider.name(), error = %e, "Backend failed, trying next");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SketchError::ConfigError("Provider chain is empty".to_string())
        }))
    }

    /// Run the full pipeline on one sketch.
    #[instrument(skip(self, image), fields(mode = mode.label(), style = style.label()))]
    pub async fn run(&self, image: &SketchImage, mode: Mode, style: Style) -> Result<Presentation> {
        image.validate()?;

        let instruction = build_instruction(mode, style);
        let (prompt_text, narrator) = self.describe(image, &instruction).await?;
        info!(chars = prompt_text.len(), "Obtained descriptive prompt");

        let request = RenderRequest::new(&prompt_text);
        info!(seed = request.seed(), "Rendering image");

        Ok(self.presenter.present(&request, mode, Some(&narrator)).await)
    }
}
