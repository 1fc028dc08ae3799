pub mod filter;
pub mod wikipedia;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Article, Language};

pub use filter::ArticleFilter;
pub use wikipedia::WikipediaFetcher;

/// Default number of articles requested per batch.
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Source of random articles. One call is one request; no retries.
#[async_trait]
pub trait ArticleFetcher {
    /// Fetch up to `count` random articles from `language`'s Wikipedia.
    async fn fetch_random(&self, count: usize, language: &Language) -> Result<Vec<Article>>;
}
