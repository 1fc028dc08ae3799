use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, WikwokError};
use crate::store::KeyValueBackend;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const UPSERT: &str = "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// SQLite-backed key-value table. The database file may be shared with
/// other `wikwok` processes.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| WikwokError::Other(format!("Database lock poisoned: {}", e)))
    }
}

impl KeyValueBackend for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(UPSERT, params![key, value, Utc::now().to_rfc3339()])?;

        Ok(())
    }

    fn update(&self, key: &str, f: &mut dyn FnMut(Option<String>) -> Result<String>) -> Result<()> {
        let mut conn = self.conn()?;
        // The write lock is held from the read until commit.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let stored: Option<String> = tx
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        let value = f(stored)?;

        tx.execute(UPSERT, params![key, value, Utc::now().to_rfc3339()])?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = SqliteStore::in_memory().unwrap();
        store.put("k", "one").unwrap();
        store.put("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_update_sees_other_connection_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikwok.db");
        let first = SqliteStore::new(&path).unwrap();
        let second = SqliteStore::new(&path).unwrap();

        first.put("n", "1").unwrap();
        second.put("n", "5").unwrap();

        first
            .update("n", &mut |stored| {
                assert_eq!(stored.as_deref(), Some("5"));
                Ok("6".to_string())
            })
            .unwrap();
        assert_eq!(second.get("n").unwrap().as_deref(), Some("6"));
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let store = SqliteStore::in_memory().unwrap();
        store.put("n", "1").unwrap();

        let result = store.update("n", &mut |_| Err(WikwokError::Other("rejected".into())));
        assert!(result.is_err());
        assert_eq!(store.get("n").unwrap().as_deref(), Some("1"));

        store.update("fresh", &mut |stored| {
            assert_eq!(stored, None);
            Ok("x".to_string())
        })
        .unwrap();
        assert_eq!(store.get("fresh").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikwok.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.put("selected_language", "{\"name\":\"Spanish\",\"code\":\"es\"}").unwrap();
        }

        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(
            reopened.get("selected_language").unwrap().as_deref(),
            Some("{\"name\":\"Spanish\",\"code\":\"es\"}")
        );
    }
}
