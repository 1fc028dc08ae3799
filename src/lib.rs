//! # WikWok
//!
//! An endless, swipe-style feed of random Wikipedia articles for the terminal.
//!
//! ## Architecture
//!
//! ```text
//! WikipediaFetcher → FeedController → TUI
//!                          ↕
//!             LikedArticlesRepository / LanguagePreference → SqliteStore
//! ```
//!
//! - [`fetcher`]: random-article queries against the MediaWiki API
//! - [`feed`]: paginated feed state with a single in-flight fetch
//! - [`store`]: persisted liked set and language selection
//! - [`tui`]: terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! wikwok
//!
//! # Read Spanish Wikipedia from now on
//! wikwok lang es
//!
//! # Print five random articles
//! wikwok random --count 5
//!
//! # List liked articles
//! wikwok liked
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// fetcher, repositories and share sink.
pub mod app;

/// Command-line interface using clap.
///
/// - `tui` - Launch the TUI (default)
/// - `random [--count N] [--lang CODE]` - Print one batch
/// - `liked` - List liked articles
/// - `languages` - List the language catalog
/// - `lang <CODE>` - Select the feed language
/// - `unlike <ID>` - Remove a liked article
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/wikwok/config.toml`, supporting:
/// - Feed batch size, dedup policy and prefetch distance
/// - Article filter and HTTP options
/// - Share target
/// - Custom colors (named or hex) and keybindings
pub mod config;

/// Core domain models.
///
/// - [`Article`](domain::Article): one fetched page
/// - [`Language`](domain::Language): a Wikipedia edition
/// - [`FeedState`](domain::FeedState): observable feed state
pub mod domain;

/// The paginated article feed.
pub mod feed;

/// Random article fetching.
///
/// - [`ArticleFetcher`](fetcher::ArticleFetcher): Async trait for article sources
/// - [`WikipediaFetcher`](fetcher::WikipediaFetcher): reqwest-based implementation
pub mod fetcher;

/// Sharing article links through the clipboard or browser.
pub mod share;

/// Key-value persistence.
///
/// - [`KeyValueBackend`](store::KeyValueBackend): Trait for string storage
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
/// - [`KeyValueStore`](store::KeyValueStore): Typed, observable value under one key
pub mod store;

/// Terminal user interface.
///
/// One article per screen. j/k page through the feed, l likes, s shares,
/// L picks a language, v shows liked articles, t toggles the theme, q quits.
pub mod tui;
