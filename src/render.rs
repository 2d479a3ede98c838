//! Image rendering via the Pollinations flux endpoint.
//!
//! Rendering is URL construction: the descriptive prompt is percent-encoded
//! into the path and the generation parameters ride as query parameters. The
//! resulting URL is itself the artifact; fetching its bytes is a separate,
//! optional step.

use rand::Rng;
use tracing::debug;

use crate::error::{Result, SketchError};

/// Pollinations image endpoint.
const POLLINATIONS_BASE: &str = "https://image.pollinations.ai/prompt";

/// Fixed output geometry and model.
pub const IMAGE_WIDTH: u32 = 1024;
pub const IMAGE_HEIGHT: u32 = 1024;
pub const IMAGE_MODEL: &str = "flux";

/// Seeds are drawn uniformly from `[0, SEED_RANGE)`.
pub const SEED_RANGE: u32 = 100_000;

/// A fully parameterized request against the image endpoint.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    prompt: String,
    width: u32,
    height: u32,
    model: String,
    seed: u32,
    enhance: bool,
}

impl RenderRequest {
    /// Build a request with a fresh random seed and enhancement enabled.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            model: IMAGE_MODEL.to_string(),
            seed: rand::thread_rng().gen_range(0..SEED_RANGE),
            enhance: true,
        }
    }

    /// Pin the seed, making the render reproducible.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Toggle server-side prompt enhancement.
    pub fn with_enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The render URL. Prompts always pass through percent-encoding so
    /// spaces, quotes and ampersands survive intact. The enhance flag only
    /// appears when enabled; the endpoint treats an absent flag as off.
    pub fn url(&self) -> String {
        let mut url = format!(
            "{}/{}?width={}&height={}&model={}&nologo=true&seed={}",
            POLLINATIONS_BASE,
            urlencoding::encode(&self.prompt),
            self.width,
            self.height,
            self.model,
            self.seed,
        );
        if self.enhance {
            url.push_str("&enhance=true");
        }
        url
    }
}

/// Fetch the rendered image bytes from a render URL.
pub async fn fetch_image_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    debug!(url = url, "Fetching rendered image");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SketchError::ApiError(format!(
            "Image fetch failed ({})",
            status
        )));
    }

    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_carries_fixed_parameters() {
        let request = RenderRequest::new("a white rabbit").with_seed(42);
        let url = request.url();
        assert!(url.starts_with("https://image.pollinations.ai/prompt/"));
        assert!(url.contains("width=1024"));
        assert!(url.contains("height=1024"));
        assert!(url.contains("model=flux"));
        assert!(url.contains("nologo=true"));
        assert!(url.contains("seed=42"));
        assert!(url.contains("enhance=true"));
    }

    #[test]
    fn test_prompt_is_percent_encoded() {
        let request = RenderRequest::new(r#"a "tiny" rabbit & friend, 50% happy"#).with_seed(1);
        let url = request.url();
        assert!(url.contains("a%20%22tiny%22%20rabbit%20%26%20friend%2C%2050%25%20happy"));
        // The raw reserved characters must not leak into the path.
        let path = url.split('?').next().unwrap();
        assert!(!path.contains(' '));
        assert!(!path.contains('"'));
        assert!(!path.contains('&'));
    }

    #[test]
    fn test_disabled_enhance_omitted_from_url() {
        let request = RenderRequest::new("rabbit").with_seed(7).with_enhance(false);
        assert!(!request.url().contains("enhance"));
    }

    #[test]
    fn test_fresh_requests_draw_seed_in_range() {
        for _ in 0..32 {
            let request = RenderRequest::new("rabbit");
            assert!(request.seed() < SEED_RANGE);
        }
    }

    #[test]
    fn test_fresh_requests_vary_their_seeds() {
        // Same prompt, fresh requests: the seeds (and thus the URLs) must
        // not collapse onto a single value. With 16 draws from 100_000 the
        // odds of all being equal are negligible.
        let seeds: std::collections::HashSet<u32> = (0..16)
            .map(|_| RenderRequest::new("same prompt").seed())
            .collect();
        assert!(seeds.len() > 1, "all 16 fresh requests drew seed {:?}", seeds);

        let urls: std::collections::HashSet<String> = seeds
            .iter()
            .map(|&s| RenderRequest::new("same prompt").with_seed(s).url())
            .collect();
        assert_eq!(urls.len(), seeds.len());
    }

    #[test]
    fn test_pinned_seed_is_stable() {
        let a = RenderRequest::new("rabbit").with_seed(99).url();
        let b = RenderRequest::new("rabbit").with_seed(99).url();
        assert_eq!(a, b);
    }
}
