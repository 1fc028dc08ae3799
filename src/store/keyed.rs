use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::app::{Result, WikwokError};
use crate::store::KeyValueBackend;

/// A typed value persisted as JSON under a single key.
///
/// Reads are served from the last committed snapshot. [`update`](Self::update)
/// holds a writer lock, re-reads the stored value inside a backend
/// transaction, persists the result and only then publishes it to observers.
/// Other processes may write the same key; their changes are picked up by
/// the next update.
pub struct KeyValueStore<T> {
    backend: Arc<dyn KeyValueBackend>,
    key: String,
    writer: Mutex<()>,
    updates: watch::Sender<T>,
}

impl<T> KeyValueStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Load `key` from `backend`, falling back to `default` when absent.
    pub fn open(
        backend: Arc<dyn KeyValueBackend>,
        key: impl Into<String>,
        default: impl FnOnce() -> T,
    ) -> Result<Self> {
        let key = key.into();
        let initial = match backend.get(&key)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => default(),
        };
        let (updates, _) = watch::channel(initial);

        Ok(Self {
            backend,
            key,
            writer: Mutex::new(()),
            updates,
        })
    }

    pub fn get(&self) -> T {
        self.updates.borrow().clone()
    }

    /// Subscribe to committed values. The receiver sees the current value
    /// immediately.
    pub fn observe(&self) -> watch::Receiver<T> {
        let mut rx = self.updates.subscribe();
        rx.mark_changed();
        rx
    }

    /// Atomically replace the stored value with the first element of
    /// `f(current)`, returning the second.
    pub async fn update<R>(&self, f: impl FnOnce(&T) -> (T, R)) -> Result<R> {
        let _guard = self.writer.lock().await;

        let mut f = Some(f);
        let mut applied = None;
        self.backend.update(&self.key, &mut |stored| {
            let current: T = match stored {
                Some(raw) => serde_json::from_str(&raw)?,
                None => self.updates.borrow().clone(),
            };
            let f = f
                .take()
                .ok_or_else(|| WikwokError::Other("update applied twice".into()))?;
            let (next, out) = f(&current);
            let encoded = serde_json::to_string(&next)?;
            applied = Some((next, out));
            Ok(encoded)
        })?;

        let (next, out) = applied.ok_or_else(|| WikwokError::Other("update not applied".into()))?;
        self.updates.send_replace(next);

        Ok(out)
    }

    /// Overwrite the value without looking at what is stored.
    pub async fn set(&self, value: T) -> Result<()> {
        let _guard = self.writer.lock().await;

        let encoded = serde_json::to_string(&value)?;
        self.backend.put(&self.key, &encoded)?;
        self.updates.send_replace(value);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn backend() -> Arc<dyn KeyValueBackend> {
        Arc::new(SqliteStore::in_memory().unwrap())
    }

    #[test]
    fn test_open_uses_default_when_absent() {
        let store: KeyValueStore<Vec<u32>> = KeyValueStore::open(backend(), "nums", Vec::new).unwrap();
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_open_rejects_corrupt_value() {
        let backend = backend();
        backend.put("nums", "not json").unwrap();
        let result: Result<KeyValueStore<Vec<u32>>> = KeyValueStore::open(backend, "nums", Vec::new);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_persists_before_publishing() {
        let backend = backend();
        let store: KeyValueStore<Vec<u32>> =
            KeyValueStore::open(backend.clone(), "nums", Vec::new).unwrap();

        let len = tokio_test::block_on(store.update(|v| {
            let mut next = v.clone();
            next.push(4);
            let len = next.len();
            (next, len)
        }))
        .unwrap();

        assert_eq!(len, 1);
        assert_eq!(store.get(), vec![4]);
        assert_eq!(backend.get("nums").unwrap().as_deref(), Some("[4]"));
    }

    #[tokio::test]
    async fn test_observe_replays_latest() {
        let store: KeyValueStore<String> =
            KeyValueStore::open(backend(), "greeting", || "hello".to_string()).unwrap();
        store.set("bonjour".to_string()).await.unwrap();

        let mut rx = store.observe();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "bonjour");

        store.set("hola".to_string()).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "hola");
    }

    #[tokio::test]
    async fn test_update_starts_from_stored_value() {
        let backend = backend();
        let store: KeyValueStore<u64> = KeyValueStore::open(backend.clone(), "counter", || 0).unwrap();

        backend.put("counter", "10").unwrap();
        let seen = store.update(|n| (n + 1, *n)).await.unwrap();

        assert_eq!(seen, 10);
        assert_eq!(store.get(), 11);
        assert_eq!(backend.get("counter").unwrap().as_deref(), Some("11"));
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let store: Arc<KeyValueStore<u64>> =
            Arc::new(KeyValueStore::open(backend(), "counter", || 0).unwrap());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.update(|n| (n + 1, ())).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get(), 32);
    }
}
