use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::app::Result;
use crate::domain::{Article, DedupPolicy, FeedState, Language};
use crate::fetcher::{ArticleFetcher, DEFAULT_BATCH_SIZE};
use crate::store::{LanguagePreference, LikedArticlesRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub batch_size: usize,
    pub dedup: DedupPolicy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            dedup: DedupPolicy::default(),
        }
    }
}

/// Owns the article feed of one screen.
///
/// All state lives in a `watch` channel; every mutation happens inside a
/// single `send_modify`/`send_if_modified` closure, so the loading guard
/// and the epoch check are atomic with respect to each other. Fetches run
/// on spawned tasks and must be created inside a tokio runtime.
pub struct FeedController {
    fetcher: Arc<dyn ArticleFetcher + Send + Sync>,
    liked: Arc<LikedArticlesRepository>,
    language: Arc<LanguagePreference>,
    settings: FeedSettings,
    state: Arc<watch::Sender<FeedState>>,
}

impl FeedController {
    /// Create the controller for the persisted language and start loading
    /// the first batch.
    pub fn new(
        fetcher: Arc<dyn ArticleFetcher + Send + Sync>,
        liked: Arc<LikedArticlesRepository>,
        language: Arc<LanguagePreference>,
        settings: FeedSettings,
    ) -> Self {
        let (state, _) = watch::channel(FeedState::new(language.get()));

        let controller = Self {
            fetcher,
            liked,
            language,
            settings,
            state: Arc::new(state),
        };
        controller.load_more();
        controller
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn selected_language(&self) -> Language {
        self.state.borrow().language.clone()
    }

    pub fn settings(&self) -> FeedSettings {
        self.settings
    }

    /// Fetch the next batch unless one is already in flight.
    ///
    /// Returns the fetch task, or `None` when the call was a no-op.
    pub fn load_more(&self) -> Option<JoinHandle<()>> {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            state.loading = true;
            ticket = Some((state.epoch, state.language.clone()));
            true
        });

        let (epoch, language) = ticket?;
        Some(self.spawn_fetch(epoch, language))
    }

    /// Switch the feed to `language`.
    ///
    /// A no-op when `language` is already selected. Otherwise the selection
    /// is persisted, the feed is cleared and exactly one fetch for the new
    /// language is started. Results of fetches issued before the switch are
    /// dropped when they arrive.
    pub async fn change_language(&self, language: Language) -> Result<Option<JoinHandle<()>>> {
        if self.state.borrow().language.code == language.code {
            return Ok(None);
        }

        self.language.set(language.clone()).await?;

        let mut epoch = 0;
        self.state.send_modify(|state| {
            state.reset(language.clone());
            epoch = state.epoch;
        });

        Ok(Some(self.spawn_fetch(epoch, language)))
    }

    /// Like or unlike `article`. The feed itself is not touched; liked
    /// status is read from the repository.
    pub async fn toggle_like(&self, article: &Article) -> Result<bool> {
        self.liked.toggle_like(article).await
    }

    pub fn is_liked(&self, id: i64) -> bool {
        self.liked.is_liked(id)
    }

    pub fn liked_ids(&self) -> HashSet<i64> {
        self.liked.liked_ids()
    }

    fn spawn_fetch(&self, epoch: u64, language: Language) -> JoinHandle<()> {
        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::clone(&self.state);
        let FeedSettings { batch_size, dedup } = self.settings;

        tokio::spawn(async move {
            let result = fetcher.fetch_random(batch_size, &language).await;

            state.send_if_modified(|state| {
                if state.epoch != epoch {
                    tracing::debug!(
                        "Discarding stale batch for {} (epoch {} != {})",
                        language.code,
                        epoch,
                        state.epoch
                    );
                    return false;
                }

                state.loading = false;
                match result {
                    Ok(batch) => {
                        let added = state.append(batch, dedup);
                        state.error = None;
                        tracing::info!("Feed now has {} articles (+{})", state.articles.len(), added);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load articles: {}", e);
                        state.error = Some(e.to_string());
                    }
                }
                true
            });
        })
    }
}
