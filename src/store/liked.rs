use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::app::Result;
use crate::domain::{Article, LikedArticles};
use crate::store::{KeyValueBackend, KeyValueStore};

pub const LIKED_ARTICLES_KEY: &str = "liked_articles_store";

/// The persisted set of liked articles, shared by every screen that shows
/// or toggles likes.
pub struct LikedArticlesRepository {
    store: KeyValueStore<LikedArticles>,
}

impl LikedArticlesRepository {
    pub fn open(backend: Arc<dyn KeyValueBackend>) -> Result<Self> {
        let store = KeyValueStore::open(backend, LIKED_ARTICLES_KEY, LikedArticles::default)?;
        Ok(Self { store })
    }

    /// Stream of liked-set snapshots, starting with the current one.
    pub fn observe_liked(&self) -> watch::Receiver<LikedArticles> {
        self.store.observe()
    }

    pub fn snapshot(&self) -> LikedArticles {
        self.store.get()
    }

    pub fn liked_ids(&self) -> HashSet<i64> {
        self.store.get().ids()
    }

    pub fn is_liked(&self, id: i64) -> bool {
        self.store.get().contains(id)
    }

    pub fn find(&self, id: i64) -> Option<Article> {
        self.store.get().articles.into_iter().find(|a| a.id == id)
    }

    /// Like `article` if no article with its id is liked yet, otherwise
    /// unlike it. Returns whether the article is liked afterwards.
    pub async fn toggle_like(&self, article: &Article) -> Result<bool> {
        let now_liked = self.store.update(|liked| liked.toggled(article)).await?;
        tracing::debug!(
            "Article {} ({}) {}",
            article.id,
            article.title,
            if now_liked { "liked" } else { "unliked" }
        );
        Ok(now_liked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;
    use crate::store::SqliteStore;

    fn article(id: i64) -> Article {
        Article::new(id, format!("Page {}", id), format!("https://en.wikipedia.org/wiki/Page_{}", id), Language::english())
            .with_extract("An extract that is long enough.")
            .with_thumbnail("https://upload.wikimedia.org/thumb.jpg")
    }

    fn repo() -> LikedArticlesRepository {
        LikedArticlesRepository::open(Arc::new(SqliteStore::in_memory().unwrap())).unwrap()
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_membership() {
        let repo = repo();
        repo.toggle_like(&article(1)).await.unwrap();
        let before = repo.snapshot();

        assert!(repo.toggle_like(&article(2)).await.unwrap());
        assert!(!repo.toggle_like(&article(2)).await.unwrap());

        assert_eq!(repo.snapshot(), before);
    }

    #[tokio::test]
    async fn test_unlike_is_observed() {
        let repo = repo();
        repo.toggle_like(&article(9)).await.unwrap();

        let mut rx = repo.observe_liked();
        assert!(rx.borrow_and_update().contains(9));

        assert!(!repo.toggle_like(&article(9)).await.unwrap());
        rx.changed().await.unwrap();
        assert!(!rx.borrow().contains(9));
    }

    #[tokio::test]
    async fn test_new_subscriber_sees_current_snapshot() {
        let repo = repo();
        repo.toggle_like(&article(4)).await.unwrap();

        let mut rx = repo.observe_liked();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().ids(), HashSet::from([4]));
    }

    #[tokio::test]
    async fn test_overlapping_toggles_on_same_id() {
        let repo = Arc::new(repo());
        let a = article(5);

        let (first, second) = tokio::join!(repo.toggle_like(&a), repo.toggle_like(&a));
        let (first, second) = (first.unwrap(), second.unwrap());

        // One toggle likes, the other unlikes; never a double insert.
        assert_ne!(first, second);
        assert!(!repo.is_liked(5));
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_liked_set_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikwok.db");

        {
            let repo = LikedArticlesRepository::open(Arc::new(SqliteStore::new(&path).unwrap())).unwrap();
            repo.toggle_like(&article(11)).await.unwrap();
        }

        let repo = LikedArticlesRepository::open(Arc::new(SqliteStore::new(&path).unwrap())).unwrap();
        let restored = repo.find(11).expect("liked article should be restored");
        assert_eq!(restored, article(11));
    }

    #[tokio::test]
    async fn test_toggle_keeps_changes_from_another_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikwok.db");

        let tui = LikedArticlesRepository::open(Arc::new(SqliteStore::new(&path).unwrap())).unwrap();
        tui.toggle_like(&article(1)).await.unwrap();

        let cli = LikedArticlesRepository::open(Arc::new(SqliteStore::new(&path).unwrap())).unwrap();
        assert!(!cli.toggle_like(&article(1)).await.unwrap());

        // Still holds the stale snapshot with article 1.
        assert!(tui.is_liked(1));
        assert!(tui.toggle_like(&article(2)).await.unwrap());
        assert_eq!(tui.liked_ids(), HashSet::from([2]));

        let reopened = LikedArticlesRepository::open(Arc::new(SqliteStore::new(&path).unwrap())).unwrap();
        assert_eq!(reopened.liked_ids(), HashSet::from([2]));
    }
}
