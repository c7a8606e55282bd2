use crate::{
    domain::Board,
    error::{LanesError, Result},
    storage::{decode_snapshot, SnapshotStore},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process key-value snapshot store.
///
/// Holds serialized JSON strings under a storage key, mirroring a browser's
/// local storage. Useful for embedding and for exercising persistence
/// failures.
pub struct MemoryStore {
    key: String,
    entries: Mutex<HashMap<String, String>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_key("kanban-data")
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Mutex::new(HashMap::new()),
            fail_saves: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// Seeds the store with a raw serialized value
    pub fn insert_raw(&self, contents: impl Into<String>) -> Result<()> {
        self.lock()?.insert(self.key.clone(), contents.into());
        Ok(())
    }

    /// The raw serialized value currently stored, if any
    pub fn raw(&self) -> Result<Option<String>> {
        Ok(self.lock()?.get(&self.key).cloned())
    }

    /// Makes every subsequent save fail until switched back
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| LanesError::StorageError("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Board>> {
        match self.raw()? {
            Some(contents) => decode_snapshot(&contents).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, board: &Board) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LanesError::StorageError(
                "storage quota exceeded".to_string(),
            ));
        }

        let json = serde_json::to_string(board)?;
        self.lock()?.insert(self.key.clone(), json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
        assert!(store.raw().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemoryStore::new();
        let board = Board::from_config(&BoardConfig::default()).unwrap();

        store.save(&board).await.unwrap();

        assert_eq!(store.save_count(), 1);
        assert!(store.raw().unwrap().unwrap().contains("\"columnOrder\""));
        assert_eq!(store.load().await.unwrap().unwrap(), board);
    }

    #[tokio::test]
    async fn test_failing_saves() {
        let store = MemoryStore::new();
        let board = Board::from_config(&BoardConfig::default()).unwrap();

        store.set_fail_saves(true);
        let err = store.save(&board).await.unwrap_err();
        assert!(matches!(err, LanesError::StorageError(_)));
        assert_eq!(store.save_count(), 0);

        store.set_fail_saves(false);
        store.save(&board).await.unwrap();
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_raw_value() {
        let store = MemoryStore::new();
        store.insert_raw("[]").unwrap();
        assert!(store.load().await.is_err());
    }
}
