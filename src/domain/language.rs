use serde::{Deserialize, Serialize};

/// A Wikipedia edition the feed can draw articles from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_rtl: bool,
}

impl Language {
    pub fn new(name: impl Into<String>, code: impl Into<String>, is_rtl: bool) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            is_rtl,
        }
    }

    /// Look up a catalog entry by its code (case-insensitive).
    pub fn find(code: &str) -> Option<Language> {
        let code = code.trim().to_lowercase();
        POPULAR_LANGUAGES
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(name, code, rtl)| Language::new(*name, *code, *rtl))
    }

    /// All catalog entries, most popular first.
    pub fn catalog() -> Vec<Language> {
        POPULAR_LANGUAGES
            .iter()
            .map(|(name, code, rtl)| Language::new(*name, *code, *rtl))
            .collect()
    }

    pub fn english() -> Self {
        Language::new("English", "en", false)
    }

    /// Host of this language's Wikipedia, e.g. `es.wikipedia.org`.
    pub fn wikipedia_host(&self) -> String {
        format!("{}.wikipedia.org", self.code)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

// (name, code, right-to-left)
const POPULAR_LANGUAGES: [(&str, &str, bool); 50] = [
    ("English", "en", false),
    ("Spanish", "es", false),
    ("French", "fr", false),
    ("German", "de", false),
    ("Russian", "ru", false),
    ("Japanese", "ja", false),
    ("Chinese", "zh", false),
    ("Italian", "it", false),
    ("Portuguese", "pt", false),
    ("Arabic", "ar", true),
    ("Hindi", "hi", false),
    ("Korean", "ko", false),
    ("Dutch", "nl", false),
    ("Turkish", "tr", false),
    ("Polish", "pl", false),
    ("Swedish", "sv", false),
    ("Vietnamese", "vi", false),
    ("Indonesian", "id", false),
    ("Greek", "el", false),
    ("Thai", "th", false),
    ("Hebrew", "he", true),
    ("Czech", "cs", false),
    ("Romanian", "ro", false),
    ("Hungarian", "hu", false),
    ("Danish", "da", false),
    ("Finnish", "fi", false),
    ("Norwegian", "no", false),
    ("Ukrainian", "uk", false),
    ("Croatian", "hr", false),
    ("Slovak", "sk", false),
    ("Serbian", "sr", false),
    ("Bulgarian", "bg", false),
    ("Malay", "ms", false),
    ("Lithuanian", "lt", false),
    ("Slovenian", "sl", false),
    ("Estonian", "et", false),
    ("Latvian", "lv", false),
    ("Persian", "fa", true),
    ("Bengali", "bn", false),
    ("Catalan", "ca", false),
    ("Filipino", "tl", false),
    ("Urdu", "ur", true),
    ("Tamil", "ta", false),
    ("Telugu", "te", false),
    ("Malayalam", "ml", false),
    ("Kannada", "kn", false),
    ("Marathi", "mr", false),
    ("Gujarati", "gu", false),
    ("Punjabi", "pa", false),
    ("Nepali", "ne", false),
];
