//! Bounded illustration batches
//!
//! [`IllustrationBatcher::fetch_all`] sends at most `limit` prompts from the
//! front of a study's prompt list, all at once, and keeps only the images
//! that came back. Each request is wrapped so that an error or an empty
//! answer turns into "no image" before the join; one failure never cancels
//! or fails its siblings.
//!
//! Results from a batch are applied through
//! [`IllustrationBatcher::fetch_and_commit`], gated by a per-invocation
//! [`Liveness`] flag. When the consuming view is torn down before the batch
//! settles, the late results are dropped instead of written to stale state.

use crate::content::GeneratedImage;
use crate::generation::GenerationClient;
use futures::future::join_all;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Liveness flag owned by one consuming scope
///
/// Clones share the same flag. Once torn down it never becomes live again.
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    token: CancellationToken,
}

impl Liveness {
    /// Create a live flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the owning scope is still live
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Mark the owning scope as torn down
    pub fn teardown(&self) {
        self.token.cancel();
    }
}

/// Fetches a bounded number of illustrations concurrently
#[derive(Clone)]
pub struct IllustrationBatcher {
    client: GenerationClient,
}

impl IllustrationBatcher {
    /// Create a batcher issuing requests through `client`
    pub fn new(client: GenerationClient) -> Self {
        Self { client }
    }

    /// Fetch illustrations for the first `limit` prompts
    ///
    /// Prompts beyond `limit` are never sent. Completes once every request
    /// has settled. The result holds only successful images, in no
    /// particular order, and may be empty.
    pub async fn fetch_all(&self, prompts: &[String], limit: usize) -> Vec<GeneratedImage> {
        let selected = &prompts[..prompts.len().min(limit)];
        if selected.is_empty() {
            return Vec::new();
        }

        info!(
            batch.requested = selected.len(),
            batch.ignored = prompts.len() - selected.len(),
            "Starting illustration batch"
        );
        let start = Instant::now();

        let requests = selected.iter().enumerate().map(|(idx, prompt)| async move {
            match self.client.request_illustration(prompt).await {
                Ok(Some(image)) => Some(image),
                Ok(None) => {
                    debug!(batch.index = idx, "No illustration returned for prompt");
                    None
                }
                Err(e) => {
                    warn!(batch.index = idx, batch.error = %e, "Error generating image");
                    None
                }
            }
        });

        let images: Vec<GeneratedImage> = join_all(requests).await.into_iter().flatten().collect();

        info!(
            batch.succeeded = images.len(),
            batch.failed = selected.len() - images.len(),
            batch.duration_ms = start.elapsed().as_millis() as u64,
            "Illustration batch settled"
        );

        images
    }

    /// Fetch a batch and hand it to `commit` if `liveness` is still live
    ///
    /// `commit` receives the whole result set in a single call, or is
    /// never called when the scope was torn down before the batch settled.
    ///
    /// # Returns
    ///
    /// Whether `commit` was invoked.
    pub async fn fetch_and_commit<F>(
        &self,
        prompts: &[String],
        limit: usize,
        liveness: &Liveness,
        commit: F,
    ) -> bool
    where
        F: FnOnce(Vec<GeneratedImage>),
    {
        let images = self.fetch_all(prompts, limit).await;

        if !liveness.is_live() {
            debug!(
                discarded = images.len(),
                "Scope torn down before illustrations settled; discarding results"
            );
            return false;
        }

        commit(images);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{FakeCapability, InlineImage};
    use std::sync::Arc;
    use std::time::Duration;

    fn png() -> InlineImage {
        InlineImage {
            mime_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        }
    }

    fn batcher(fake: FakeCapability) -> (IllustrationBatcher, Arc<FakeCapability>) {
        let fake = Arc::new(fake);
        let client = GenerationClient::new(fake.clone(), "16:9");
        (IllustrationBatcher::new(client), fake)
    }

    fn prompts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successes() {
        let (batcher, fake) = batcher(
            FakeCapability::new()
                .with_image_error("storm", "backend exploded")
                .with_image("dove", png()),
        );

        let images = batcher
            .fetch_all(&prompts(&["A storm at sea", "A dove descending"]), 2)
            .await;

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].prompt, "A dove descending");
        assert_eq!(fake.image_calls(), 2);
    }

    #[tokio::test]
    async fn test_limit_bounds_requests() {
        let (batcher, fake) = batcher(FakeCapability::new().with_image("p", png()));

        let images = batcher
            .fetch_all(&prompts(&["p1", "p2", "p3", "p4", "p5"]), 2)
            .await;

        assert_eq!(images.len(), 2);
        assert_eq!(fake.image_calls(), 2);
        let sent = fake.image_prompts();
        assert!(sent.iter().any(|p| p.ends_with("p1")));
        assert!(sent.iter().any(|p| p.ends_with("p2")));
        assert!(!sent.iter().any(|p| p.ends_with("p3")));
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_set() {
        let (batcher, _) = batcher(FakeCapability::new().with_image_error("", "down"));
        assert!(batcher.fetch_all(&prompts(&["a", "b"]), 2).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompts_and_zero_limit_send_nothing() {
        let (batcher, fake) = batcher(FakeCapability::new());
        assert!(batcher.fetch_all(&[], 2).await.is_empty());
        assert!(batcher.fetch_all(&prompts(&["a"]), 0).await.is_empty());
        assert_eq!(fake.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_requests_run_concurrently() {
        let (batcher, _) = batcher(
            FakeCapability::new()
                .with_image("", png())
                .with_image_delay(Duration::from_millis(200)),
        );

        let start = Instant::now();
        let images = batcher.fetch_all(&prompts(&["a", "b"]), 2).await;
        assert_eq!(images.len(), 2);
        assert!(start.elapsed() < Duration::from_millis(390));
    }

    #[tokio::test]
    async fn test_commit_when_live() {
        let (batcher, _) = batcher(FakeCapability::new().with_image("dove", png()));
        let liveness = Liveness::new();
        let mut committed = Vec::new();

        let applied = batcher
            .fetch_and_commit(&prompts(&["A dove", "A lamb"]), 2, &liveness, |images| {
                committed = images
            })
            .await;

        assert!(applied);
        assert_eq!(committed.len(), 1);
    }

    #[tokio::test]
    async fn test_commit_skipped_after_teardown() {
        let (batcher, fake) = batcher(
            FakeCapability::new()
                .with_image("a", png())
                .with_image_delay(Duration::from_millis(50)),
        );
        let liveness = Liveness::new();
        let pending = prompts(&["a"]);
        let mut commit_calls = 0;

        let (applied, _) = tokio::join!(
            batcher.fetch_and_commit(&pending, 2, &liveness, |_| commit_calls += 1),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                liveness.teardown();
            }
        );

        assert!(!applied);
        assert_eq!(commit_calls, 0);
        assert_eq!(fake.image_calls(), 1, "request was still sent");
    }

    #[test]
    fn test_liveness_clones_share_state() {
        let liveness = Liveness::new();
        let view = liveness.clone();
        assert!(view.is_live());
        liveness.teardown();
        assert!(!view.is_live());
    }
}
