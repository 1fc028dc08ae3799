pub mod keyed;
pub mod liked;
pub mod preferences;
pub mod sqlite;

use crate::app::Result;

pub use keyed::KeyValueStore;
pub use liked::LikedArticlesRepository;
pub use preferences::LanguagePreference;
pub use sqlite::SqliteStore;

/// Durable string storage the typed stores are layered on.
///
/// Implementations must be safe to share between tasks. Other processes may
/// write the same keys, so read-modify-write goes through [`update`](Self::update).
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Replace the value under `key` with `f(stored)`, with no other writer
    /// in between. Nothing is written if `f` fails.
    fn update(&self, key: &str, f: &mut dyn FnMut(Option<String>) -> Result<String>) -> Result<()>;
}
