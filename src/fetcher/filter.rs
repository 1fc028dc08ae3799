use serde::Deserialize;

use crate::domain::Article;

/// Which fetched articles are worth showing in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArticleFilter {
    pub require_thumbnail: bool,
    /// The extract must be strictly longer than this many characters.
    pub min_extract_len: usize,
}

impl ArticleFilter {
    pub const DEFAULT_MIN_EXTRACT_LEN: usize = 15;

    /// Keep everything that has a title and a url.
    pub fn none() -> Self {
        Self {
            require_thumbnail: false,
            min_extract_len: 0,
        }
    }

    pub fn keeps(&self, article: &Article) -> bool {
        if article.title.is_empty() || article.url.is_empty() {
            return false;
        }
        if self.require_thumbnail && article.thumbnail.is_none() {
            return false;
        }
        self.min_extract_len == 0 || article.extract_len() > self.min_extract_len
    }
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            require_thumbnail: true,
            min_extract_len: Self::DEFAULT_MIN_EXTRACT_LEN,
        }
    }
}
