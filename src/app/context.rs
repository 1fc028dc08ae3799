use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::app::error::{Result, WikwokError};
use crate::config::Config;
use crate::feed::FeedController;
use crate::fetcher::{ArticleFetcher, WikipediaFetcher};
use crate::share::ShareSink;
use crate::store::{KeyValueBackend, LanguagePreference, LikedArticlesRepository, SqliteStore};

pub struct AppContext {
    pub fetcher: Arc<dyn ArticleFetcher + Send + Sync>,
    pub liked: Arc<LikedArticlesRepository>,
    pub language: Arc<LanguagePreference>,
    pub share: Box<dyn ShareSink>,
    pub config: Config,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let fetcher = Self::build_fetcher(&config)?;
        Self::assemble(store, fetcher, config)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        let fetcher = Self::build_fetcher(&config)?;
        Self::assemble(store, fetcher, config)
    }

    /// In-memory context around a caller-supplied fetcher.
    pub fn with_fetcher(
        fetcher: Arc<dyn ArticleFetcher + Send + Sync>,
        config: Config,
    ) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::assemble(store, fetcher, config)
    }

    fn assemble(
        backend: Arc<dyn KeyValueBackend>,
        fetcher: Arc<dyn ArticleFetcher + Send + Sync>,
        config: Config,
    ) -> Result<Self> {
        let liked = Arc::new(LikedArticlesRepository::open(backend.clone())?);
        let language = Arc::new(LanguagePreference::open(backend)?);
        let share = config.share.target.sink();

        Ok(Self {
            fetcher,
            liked,
            language,
            share,
            config,
        })
    }

    fn build_fetcher(config: &Config) -> Result<Arc<dyn ArticleFetcher + Send + Sync>> {
        let mut fetcher = WikipediaFetcher::with_options(
            config.filter,
            config.fetch.timeout(),
            &config.fetch.user_agent,
        )?;
        if let Some(api_url) = &config.fetch.api_url {
            fetcher = fetcher.with_base_url(Url::parse(api_url)?);
        }
        Ok(Arc::new(fetcher))
    }

    /// A feed for the persisted language. Starts its first fetch right away,
    /// so it must be called inside a tokio runtime.
    pub fn feed_controller(&self) -> FeedController {
        FeedController::new(
            self.fetcher.clone(),
            self.liked.clone(),
            self.language.clone(),
            self.config.feed.settings(),
        )
    }

    pub fn default_db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("wikwok.db"))
    }

    /// `<data_dir>/wikwok`, created if missing.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| WikwokError::Config("Could not find data directory".into()))?;
        let wikwok_dir = data_dir.join("wikwok");
        std::fs::create_dir_all(&wikwok_dir)?;
        Ok(wikwok_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_api_url_is_rejected() {
        let mut config = Config::default();
        config.fetch.api_url = Some("not a url".to_string());

        let err = AppContext::in_memory(config).err().unwrap();
        assert!(matches!(err, WikwokError::InvalidUrl(_)));
    }

    #[test]
    fn test_in_memory_context_starts_empty() {
        let mut config = Config::default();
        config.fetch.api_url = Some("http://127.0.0.1:8080/w/api.php".to_string());

        let ctx = AppContext::in_memory(config).unwrap();
        assert!(ctx.liked.snapshot().is_empty());
        assert_eq!(ctx.language.get().code, "en");
    }
}
