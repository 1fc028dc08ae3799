pub mod article;
pub mod language;
pub mod state;
pub mod theme;

pub use article::{Article, LikedArticles};
pub use language::Language;
pub use state::{DedupPolicy, FeedPhase, FeedState};
pub use theme::ThemeMode;
