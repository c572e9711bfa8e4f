use crate::storage::Storage;
use crate::Result;
use anyhow::bail;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// An in-memory `Storage`. Clones share the same underlying map, so a test can hand one clone to
/// a store and inspect or tamper with the values through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `fail` is true, every subsequent `set` and `remove` returns an error, as a full or
    /// unavailable medium would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn values(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned lock only means another test thread panicked; the map is still usable.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("The storage medium is not accepting writes");
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.values().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_values() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set("k", "v").await.unwrap();
        assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(b.keys().await.unwrap(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_fail_writes() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").await.unwrap();
        storage.fail_writes(true);
        assert!(storage.set("k", "w").await.is_err());
        assert!(storage.remove("k").await.is_err());
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));
        storage.fail_writes(false);
        storage.remove("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }
}
