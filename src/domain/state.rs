use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Article, Language};

/// How articles that are already in the feed are treated when a new batch
/// arrives. The random generator can return the same page twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Append every article of the batch.
    #[default]
    KeepAll,
    /// Skip articles whose id is already present.
    SkipSeen,
}

/// Coarse projection of [`FeedState`] for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Empty,
    EmptyLoading,
    EmptyError,
    HasArticles,
    HasArticlesLoading,
    HasArticlesError,
}

/// The observable state of one feed screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    pub articles: Vec<Article>,
    pub loading: bool,
    pub error: Option<String>,
    pub language: Language,
    /// Bumped on every language switch; fetches tagged with an older epoch
    /// are discarded on arrival.
    pub epoch: u64,
}

impl FeedState {
    pub fn new(language: Language) -> Self {
        Self {
            articles: Vec::new(),
            loading: false,
            error: None,
            language,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        match (self.articles.is_empty(), self.loading, self.error.is_some()) {
            (true, true, _) => FeedPhase::EmptyLoading,
            (true, false, true) => FeedPhase::EmptyError,
            (true, false, false) => FeedPhase::Empty,
            (false, true, _) => FeedPhase::HasArticlesLoading,
            (false, false, true) => FeedPhase::HasArticlesError,
            (false, false, false) => FeedPhase::HasArticles,
        }
    }

    /// Clear the feed for `language` and mark the first batch as in flight.
    pub fn reset(&mut self, language: Language) {
        self.articles.clear();
        self.error = None;
        self.loading = true;
        self.language = language;
        self.epoch += 1;
    }

    /// Append a batch, returning how many articles were added.
    pub fn append(&mut self, batch: Vec<Article>, dedup: DedupPolicy) -> usize {
        let before = self.articles.len();
        match dedup {
            DedupPolicy::KeepAll => self.articles.extend(batch),
            DedupPolicy::SkipSeen => {
                let mut seen: HashSet<i64> = self.articles.iter().map(|a| a.id).collect();
                self.articles
                    .extend(batch.into_iter().filter(|a| seen.insert(a.id)));
            }
        }
        self.articles.len() - before
    }
}
