use std::sync::Arc;

use crate::app::Result;
use crate::domain::Language;
use crate::store::{KeyValueBackend, KeyValueStore};

pub const SELECTED_LANGUAGE_KEY: &str = "selected_language";

/// The persisted language selection. Defaults to English.
pub struct LanguagePreference {
    store: KeyValueStore<Language>,
}

impl LanguagePreference {
    pub fn open(backend: Arc<dyn KeyValueBackend>) -> Result<Self> {
        let store = KeyValueStore::open(backend, SELECTED_LANGUAGE_KEY, Language::default)?;
        Ok(Self { store })
    }

    pub fn get(&self) -> Language {
        self.store.get()
    }

    pub async fn set(&self, language: Language) -> Result<()> {
        tracing::info!("Selected language: {}", language);
        self.store.set(language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn test_defaults_to_english() {
        let pref = LanguagePreference::open(Arc::new(SqliteStore::in_memory().unwrap())).unwrap();
        assert_eq!(pref.get(), Language::english());
    }

    #[tokio::test]
    async fn test_selection_is_persisted() {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(SqliteStore::in_memory().unwrap());

        let pref = LanguagePreference::open(backend.clone()).unwrap();
        pref.set(Language::find("he").unwrap()).await.unwrap();

        let reopened = LanguagePreference::open(backend).unwrap();
        let lang = reopened.get();
        assert_eq!(lang.code, "he");
        assert!(lang.is_rtl);
    }
}
