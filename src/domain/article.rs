use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::Language;

/// One fetched Wikipedia page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub extract: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub language: Language,
}

impl Article {
    pub fn new(id: i64, title: impl Into<String>, url: impl Into<String>, language: Language) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            extract: String::new(),
            thumbnail: None,
            language,
        }
    }

    pub fn with_extract(mut self, extract: impl Into<String>) -> Self {
        self.extract = extract.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Number of characters (not bytes) in the extract.
    pub fn extract_len(&self) -> usize {
        self.extract.chars().count()
    }
}

/// The persisted liked set. Holds full snapshots so liked articles still
/// render after a restart; at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedArticles {
    pub articles: Vec<Article>,
}

impl LikedArticles {
    pub fn contains(&self, id: i64) -> bool {
        self.articles.iter().any(|a| a.id == id)
    }

    pub fn ids(&self) -> HashSet<i64> {
        self.articles.iter().map(|a| a.id).collect()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Returns the toggled set and whether `article` is liked in it.
    pub fn toggled(&self, article: &Article) -> (LikedArticles, bool) {
        if self.contains(article.id) {
            let articles = self
                .articles
                .iter()
                .filter(|a| a.id != article.id)
                .cloned()
                .collect();
            (LikedArticles { articles }, false)
        } else {
            let mut articles = self.articles.clone();
            articles.push(article.clone());
            (LikedArticles { articles }, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64) -> Article {
        Article::new(id, format!("Page {}", id), format!("https://en.wikipedia.org/wiki/Page_{}", id), Language::english())
    }

    #[test]
    fn test_extract_len_counts_chars() {
        let a = article(1).with_extract("Ωmega");
        assert_eq!(a.extract_len(), 5);
    }

    #[test]
    fn test_toggle_inserts_then_removes() {
        let empty = LikedArticles::default();
        let (liked, now_liked) = empty.toggled(&article(7));
        assert!(now_liked);
        assert!(liked.contains(7));

        let (unliked, now_liked) = liked.toggled(&article(7));
        assert!(!now_liked);
        assert_eq!(unliked, empty);
    }

    #[test]
    fn test_toggle_matches_by_id_only() {
        let (liked, _) = LikedArticles::default().toggled(&article(3));
        let changed = article(3).with_extract("different snapshot");
        let (after, now_liked) = liked.toggled(&changed);
        assert!(!now_liked);
        assert!(after.is_empty());
    }

    #[test]
    fn test_toggle_preserves_order_of_others() {
        let mut set = LikedArticles::default();
        for id in [1, 2, 3] {
            set = set.toggled(&article(id)).0;
        }
        let (set, _) = set.toggled(&article(2));
        let ids: Vec<_> = set.articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_article_serde_defaults() {
        let a: Article = serde_json::from_str(
            r#"{"id":5,"title":"T","url":"https://en.wikipedia.org/wiki/T"}"#,
        )
        .unwrap();
        assert_eq!(a.extract, "");
        assert_eq!(a.thumbnail, None);
        assert_eq!(a.language, Language::english());
    }
}
