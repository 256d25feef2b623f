//! In-process fake capability for unit and integration tests
//!
//! [`FakeCapability`] implements [`GenerationCapability`] without any
//! network I/O. Content responses and per-prompt image outcomes are scripted
//! up front; every request is recorded so tests can assert on what was sent
//! and how many calls were made.
//!
//! # Example
//!
//! ```
//! use bibliaai::providers::{FakeCapability, GenerationCapability, ImageRequest, InlineImage};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let fake = FakeCapability::new()
//!     .with_image("dove", InlineImage { mime_type: "image/png".into(), data: "AAA".into() })
//!     .with_image_error("storm", "quota exceeded");
//!
//! let ok = fake
//!     .generate_image(&ImageRequest { prompt: "A dove".into(), aspect_ratio: "16:9".into() })
//!     .await
//!     .unwrap();
//! assert!(ok.is_some());
//!
//! let err = fake
//!     .generate_image(&ImageRequest { prompt: "A storm".into(), aspect_ratio: "16:9".into() })
//!     .await;
//! assert!(err.is_err());
//! assert_eq!(fake.image_calls(), 2);
//! # }
//! ```

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{BibliaError, Result};
use crate::providers::{ContentRequest, GenerationCapability, ImageRequest, InlineImage};

/// Scripted outcome for an image prompt
#[derive(Debug, Clone)]
enum ImageOutcome {
    Image(InlineImage),
    Error(String),
}

/// Scripted generative capability
///
/// Unscripted content requests fail; unscripted image prompts return
/// `Ok(None)`. Image rules match when the request prompt contains the rule's
/// key; the first matching rule wins.
#[derive(Debug, Default)]
pub struct FakeCapability {
    content: Option<std::result::Result<String, String>>,
    images: Vec<(String, ImageOutcome)>,
    image_delay: Option<Duration>,
    content_requests: Mutex<Vec<ContentRequest>>,
    image_requests: Mutex<Vec<ImageRequest>>,
}

impl FakeCapability {
    /// Create a fake with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `text` for every content request
    pub fn with_content(mut self, text: impl Into<String>) -> Self {
        self.content = Some(Ok(text.into()));
        self
    }

    /// Fail every content request with `message`
    pub fn with_content_error(mut self, message: impl Into<String>) -> Self {
        self.content = Some(Err(message.into()));
        self
    }

    /// Return `image` for prompts containing `key`
    pub fn with_image(mut self, key: impl Into<String>, image: InlineImage) -> Self {
        self.images.push((key.into(), ImageOutcome::Image(image)));
        self
    }

    /// Fail prompts containing `key` with `message`
    pub fn with_image_error(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.images
            .push((key.into(), ImageOutcome::Error(message.into())));
        self
    }

    /// Sleep for `delay` before answering every image request
    pub fn with_image_delay(mut self, delay: Duration) -> Self {
        self.image_delay = Some(delay);
        self
    }

    /// Number of content requests received
    pub fn content_calls(&self) -> usize {
        self.content_requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Number of image requests received
    pub fn image_calls(&self) -> usize {
        self.image_requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Prompts of every image request received, in arrival order
    pub fn image_prompts(&self) -> Vec<String> {
        self.image_requests
            .lock()
            .map(|r| r.iter().map(|req| req.prompt.clone()).collect())
            .unwrap_or_default()
    }

    /// Every image request received, in arrival order
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// The most recent content request
    pub fn last_content_request(&self) -> Option<ContentRequest> {
        self.content_requests
            .lock()
            .ok()
            .and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl GenerationCapability for FakeCapability {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate_structured(&self, request: &ContentRequest) -> Result<String> {
        if let Ok(mut requests) = self.content_requests.lock() {
            requests.push(request.clone());
        }

        match &self.content {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(BibliaError::Provider(message.clone()).into()),
            None => Err(BibliaError::Provider("no content scripted".to_string()).into()),
        }
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineImage>> {
        if let Ok(mut requests) = self.image_requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.image_delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .images
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, outcome)| outcome.clone());

        match outcome {
            Some(ImageOutcome::Image(image)) => Ok(Some(image)),
            Some(ImageOutcome::Error(message)) => Err(BibliaError::Provider(message).into()),
            None => Ok(None),
        }
    }
}
