//! Configuration management for WikWok.
//!
//! Configuration is read from `~/.config/wikwok/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::{ColorConfig, Palette};
pub use keybindings::KeybindingConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::DedupPolicy;
use crate::feed::FeedSettings;
use crate::fetcher::wikipedia::DEFAULT_USER_AGENT;
use crate::fetcher::{ArticleFilter, DEFAULT_BATCH_SIZE};
use crate::share::ShareTarget;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub filter: ArticleFilter,
    pub fetch: FetchConfig,
    pub share: ShareConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub batch_size: usize,
    pub dedup: DedupPolicy,
    /// Load the next batch once the reader is this many articles from the end.
    pub prefetch_threshold: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            dedup: DedupPolicy::default(),
            prefetch_threshold: 3,
        }
    }
}

impl FeedConfig {
    pub fn settings(&self) -> FeedSettings {
        FeedSettings {
            batch_size: self.batch_size.max(1),
            dedup: self.dedup,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Unset means the HTTP client's own default.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    /// Query endpoint used for every language instead of `<code>.wikipedia.org`.
    pub api_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_url: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub target: ShareTarget,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    /// Load configuration from `path`.
    ///
    /// If the file doesn't exist, a commented default is written there first.
    /// Missing fields use default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ConfigError::Invalid { message, .. } => ConfigError::Invalid {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            source: e,
        })?;

        config
            .keybindings
            .validate()
            .map_err(|message| ConfigError::Invalid {
                path: PathBuf::new(),
                message,
            })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/wikwok/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("wikwok").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# WikWok Configuration

[feed]
# Articles requested per batch
batch_size = 30

# "keep_all" shows every article the API returns, even if it was already
# seen in this session; "skip_seen" drops repeats
dedup = "keep_all"

# Start loading the next batch this many articles before the end
prefetch_threshold = 3

[filter]
# Only show articles that come with an image
require_thumbnail = true

# Only show articles whose extract is longer than this many characters
min_extract_len = 15

[fetch]
# Request timeout in seconds (leave unset for the HTTP client's default)
# timeout_secs = 10

# Send every query to this endpoint instead of <code>.wikipedia.org,
# e.g. a local mirror
# api_url = "http://localhost:8080/w/api.php"

[share]
# "clipboard" copies the article link, "browser" opens it
target = "clipboard"

[colors]
# Starting theme, toggled at runtime with "t": "dark" or "light"
theme = "dark"

# Colors can be named (Black, Red, Cyan, DarkGray, LightRed, ...) or hex
# ("#RRGGBB" / "#RGB"). Unset entries keep the built-in palette.
[colors.dark]
accent = "#5FBA9A"

[colors.light]
accent = "#2E7D62"

[keybindings]
# Single characters ("j"), special keys (Enter, Esc, Space, PageDown, F1-F12)
# and modifiers ("Ctrl+c", "Shift+Tab")
quit = ["q", "Ctrl+c"]
next_article = ["j", "Down", "PageDown", "Space"]
prev_article = ["k", "Up", "PageUp"]
toggle_like = ["l", "f"]
share = ["s"]
open_in_browser = ["o"]
languages = ["L"]
liked = ["v"]
retry = ["r"]
toggle_theme = ["t"]
select = ["Enter"]
back = ["Esc", "Backspace"]
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThemeMode;
    use ratatui::style::Color;

    #[test]
    fn test_default_config_deserializes() {
        let config = Config::parse(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.feed.batch_size, 30);
        assert_eq!(config.feed.dedup, DedupPolicy::KeepAll);
        assert_eq!(config.filter, ArticleFilter::default());
        assert_eq!(config.fetch.timeout(), None);
        assert_eq!(config.fetch.api_url, None);
        assert_eq!(config.share.target, ShareTarget::Clipboard);
        assert_eq!(config.colors.theme, ThemeMode::Dark);
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[feed]
dedup = "skip_seen"

[colors.dark]
liked = "#FF0000"
"##;
        let config = Config::parse(content).expect("Partial config should work");

        assert_eq!(config.feed.dedup, DedupPolicy::SkipSeen);
        assert_eq!(config.feed.batch_size, 30);
        assert_eq!(config.colors.dark.liked, Color::Rgb(255, 0, 0));
        assert_eq!(config.colors.dark.accent, Palette::dark().accent);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").expect("Empty config should work");
        assert_eq!(config.feed.prefetch_threshold, 3);
        assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_fetch_section() {
        let content = r##"
[fetch]
timeout_secs = 10
api_url = "http://localhost:8080/w/api.php"
"##;
        let config = Config::parse(content).unwrap();
        assert_eq!(config.fetch.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(
            config.fetch.api_url.as_deref(),
            Some("http://localhost:8080/w/api.php")
        );
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let config = Config::parse("[feed]\nbatch_size = 0").unwrap();
        assert_eq!(config.feed.settings().batch_size, 1);
    }

    #[test]
    fn test_bad_keybinding_is_reported() {
        let err = Config::parse("[keybindings]\nquit = [\"Super+q\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikwok").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.feed.batch_size, 30);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.keybindings.share, vec!["s"]);
    }
}
