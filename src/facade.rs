//! Single entry point for the presentation layer
//!
//! [`OrchestrationFacade`] owns the generation client, the illustration
//! batcher and the study history. Generation errors propagate to the caller
//! untouched; history writes triggered by a generation are best effort.

use crate::config::Config;
use crate::content::{GeneratedImage, StudyContent};
use crate::error::Result;
use crate::generation::GenerationClient;
use crate::illustrations::{IllustrationBatcher, Liveness};
use crate::providers::{create_capability, GenerationCapability};
use crate::storage::{HistoryStore, KeyValueStore, SqliteKeyValueStore, TimelineEntry};
use std::sync::{Arc, Mutex, MutexGuard};

/// Coordinates study generation, illustrations and history
pub struct OrchestrationFacade {
    client: GenerationClient,
    batcher: IllustrationBatcher,
    history: Mutex<HistoryStore>,
    illustration_limit: usize,
    record_on_generate: bool,
}

impl OrchestrationFacade {
    /// Build a facade over an explicit capability and store
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read from `store`.
    pub fn new(
        capability: Arc<dyn GenerationCapability>,
        store: Arc<dyn KeyValueStore>,
        config: &Config,
    ) -> Result<Self> {
        let client = GenerationClient::new(capability, config.illustrations.aspect_ratio.clone());
        let history = HistoryStore::load(store, config.history.max_entries)?;

        Ok(Self {
            batcher: IllustrationBatcher::new(client.clone()),
            client,
            history: Mutex::new(history),
            illustration_limit: config.illustrations.limit,
            record_on_generate: config.history.record_on_generate,
        })
    }

    /// Build a facade from configuration
    ///
    /// Uses the configured provider and the default SQLite store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let capability = create_capability(&config.provider)?;
        let store = Arc::new(SqliteKeyValueStore::new()?);
        Self::new(capability, store, config)
    }

    /// Generate a study for `topic`
    ///
    /// Illustrations are not fetched here; see
    /// [`fetch_illustrations`](Self::fetch_illustrations).
    ///
    /// # Errors
    ///
    /// Returns [`BibliaError::Generation`](crate::error::BibliaError::Generation)
    /// when the request or its validation fails. Nothing is recorded in
    /// that case.
    pub async fn generate(&self, topic: &str) -> Result<StudyContent> {
        let content = self.client.request_content(topic).await?;

        if self.record_on_generate {
            if let Err(e) = self.save_to_history(&content) {
                tracing::warn!("Failed to record study in history: {}", e);
            }
        }

        Ok(content)
    }

    /// Generate a fresh study from a history entry
    ///
    /// The entry whose id starts with `id_prefix` supplies its title as the
    /// topic; everything else behaves like [`generate`](Self::generate).
    ///
    /// # Errors
    ///
    /// Returns [`BibliaError::HistoryEntryNotFound`](crate::error::BibliaError::HistoryEntryNotFound)
    /// when no single entry matches, or any error from `generate`.
    pub async fn reopen(&self, id_prefix: &str) -> Result<StudyContent> {
        let topic = self.lock_history().find(id_prefix)?.title.clone();
        tracing::info!(topic = %topic, "Reopening study from history");
        self.generate(&topic).await
    }

    /// Record `content` in the history
    ///
    /// # Returns
    ///
    /// `false` when the same title and theme were already recorded.
    pub fn save_to_history(&self, content: &StudyContent) -> Result<bool> {
        self.lock_history().add(&content.title, &content.theme)
    }

    /// Fetch illustrations for `content` and commit them while `liveness`
    /// holds
    ///
    /// # Returns
    ///
    /// Whether `commit` was invoked.
    pub async fn fetch_illustrations<F>(
        &self,
        content: &StudyContent,
        liveness: &Liveness,
        commit: F,
    ) -> bool
    where
        F: FnOnce(Vec<GeneratedImage>),
    {
        self.batcher
            .fetch_and_commit(
                &content.illustration_prompts,
                self.illustration_limit,
                liveness,
                commit,
            )
            .await
    }

    /// Snapshot of the history, most recent first
    pub fn history(&self) -> Vec<TimelineEntry> {
        self.lock_history().list().to_vec()
    }

    pub fn clear_history(&self) -> Result<()> {
        self.lock_history().clear()
    }

    /// Whether successful generations are recorded automatically
    pub fn records_on_generate(&self) -> bool {
        self.record_on_generate
    }

    /// Name of the active capability
    pub fn capability_name(&self) -> &str {
        self.client.capability_name()
    }

    fn lock_history(&self) -> MutexGuard<'_, HistoryStore> {
        // Entries are swapped in only after a successful persist.
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BibliaError;
    use crate::providers::{FakeCapability, InlineImage};
    use crate::storage::HISTORY_KEY;
    use crate::test_utils::{memory_store, sample_study_value};

    fn png() -> InlineImage {
        InlineImage {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        }
    }

    fn facade_with(fake: FakeCapability, config: &Config) -> (OrchestrationFacade, Arc<FakeCapability>) {
        let fake = Arc::new(fake);
        let facade = OrchestrationFacade::new(fake.clone(), memory_store(), config).unwrap();
        (facade, fake)
    }

    #[tokio::test]
    async fn test_generate_records_history_by_default() {
        let (facade, _) = facade_with(
            FakeCapability::new().with_content(sample_study_value().to_string()),
            &Config::default(),
        );

        let study = facade.generate("A Graça").await.unwrap();
        assert_eq!(study.theme, "Graça Salvadora");

        let history = facade.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "A Graça que Transforma");
        assert_eq!(history[0].theme, "Graça Salvadora");
    }

    #[tokio::test]
    async fn test_generate_twice_keeps_single_entry() {
        let (facade, fake) = facade_with(
            FakeCapability::new().with_content(sample_study_value().to_string()),
            &Config::default(),
        );

        facade.generate("A Graça").await.unwrap();
        facade.generate("A Graça").await.unwrap();

        assert_eq!(facade.history().len(), 1);
        assert_eq!(fake.content_calls(), 2);
    }

    #[tokio::test]
    async fn test_generate_without_recording() {
        let mut config = Config::default();
        config.history.record_on_generate = false;
        let (facade, _) = facade_with(
            FakeCapability::new().with_content(sample_study_value().to_string()),
            &config,
        );

        let study = facade.generate("A Graça").await.unwrap();
        assert!(facade.history().is_empty());

        assert!(facade.save_to_history(&study).unwrap());
        assert!(!facade.save_to_history(&study).unwrap());
        assert_eq!(facade.history().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_failure_propagates_and_records_nothing() {
        let (facade, fake) = facade_with(
            FakeCapability::new().with_content_error("quota exceeded"),
            &Config::default(),
        );

        let err = facade.generate("Fé").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BibliaError>(),
            Some(BibliaError::Generation(_))
        ));
        assert!(facade.history().is_empty());
        assert_eq!(fake.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_does_not_fetch_illustrations() {
        let (facade, fake) = facade_with(
            FakeCapability::new()
                .with_content(sample_study_value().to_string())
                .with_image("", png()),
            &Config::default(),
        );

        facade.generate("A Graça").await.unwrap();
        assert_eq!(fake.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_illustrations_uses_configured_limit() {
        let (facade, fake) = facade_with(
            FakeCapability::new()
                .with_content(sample_study_value().to_string())
                .with_image("shepherd", png())
                .with_image_error("tomb", "quota exceeded")
                .with_image("prodigal", png()),
            &Config::default(),
        );

        let study = facade.generate("A Graça").await.unwrap();
        let liveness = Liveness::new();
        let mut images = Vec::new();
        let applied = facade
            .fetch_illustrations(&study, &liveness, |batch| images = batch)
            .await;

        assert!(applied);
        assert_eq!(fake.image_calls(), 2);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].prompt, "A shepherd carrying a lost lamb at sunrise");
        assert!(images[0].url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_generation() {
        struct ReadOnlyStore;

        impl KeyValueStore for ReadOnlyStore {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Ok(None)
            }
            fn set(&self, _key: &str, _value: &str) -> Result<()> {
                Err(BibliaError::Storage("read-only".to_string()).into())
            }
            fn remove(&self, _key: &str) -> Result<()> {
                Err(BibliaError::Storage("read-only".to_string()).into())
            }
        }

        let fake = Arc::new(FakeCapability::new().with_content(sample_study_value().to_string()));
        let facade =
            OrchestrationFacade::new(fake, Arc::new(ReadOnlyStore), &Config::default()).unwrap();

        let study = facade.generate("A Graça").await.unwrap();
        assert_eq!(study.title, "A Graça que Transforma");
        assert!(facade.history().is_empty());
    }

    #[test]
    fn test_clear_history_removes_persisted_list() {
        let store = memory_store();
        let fake = Arc::new(FakeCapability::new());
        let facade = OrchestrationFacade::new(fake, store.clone(), &Config::default()).unwrap();

        facade
            .save_to_history(&crate::test_utils::sample_study())
            .unwrap();
        assert!(store.get(HISTORY_KEY).unwrap().is_some());

        facade.clear_history().unwrap();
        assert!(facade.history().is_empty());
        assert!(store.get(HISTORY_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_serialized() {
        let (facade, _) = facade_with(FakeCapability::new(), &Config::default());
        let facade = Arc::new(facade);

        let mut handles = Vec::new();
        for i in 0..8 {
            let facade = facade.clone();
            handles.push(tokio::spawn(async move {
                let mut study = crate::test_utils::sample_study();
                study.title = format!("Estudo {}", i);
                facade.save_to_history(&study).unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(facade.history().len(), 8);
    }

    #[tokio::test]
    async fn test_reopen_generates_from_stored_title() {
        let (facade, fake) = facade_with(
            FakeCapability::new().with_content(sample_study_value().to_string()),
            &Config::default(),
        );
        let mut stored = crate::test_utils::sample_study();
        stored.title = "Esperança no Advento".to_string();
        facade.save_to_history(&stored).unwrap();
        let id = facade.history()[0].id.clone();

        let study = facade.reopen(&id[..8]).await.unwrap();
        assert_eq!(study.title, "A Graça que Transforma");

        let sent = fake.last_content_request().unwrap();
        assert!(sent.instruction.contains("\"Esperança no Advento\""));
        assert_eq!(facade.history().len(), 2);
    }

    #[tokio::test]
    async fn test_reopen_unknown_id_sends_nothing() {
        let (facade, fake) = facade_with(FakeCapability::new(), &Config::default());

        let err = facade.reopen("deadbeef").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BibliaError>(),
            Some(BibliaError::HistoryEntryNotFound(_))
        ));
        assert_eq!(fake.content_calls(), 0);
    }
}
