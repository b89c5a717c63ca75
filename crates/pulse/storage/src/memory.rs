//! In-memory reference implementation of the snapshot store.
//!
//! This adapter is deterministic and test-friendly. Production deployments
//! use the platform's shared cache service; this one keeps everything in a
//! process-local map with lazy TTL expiry.

use crate::traits::SnapshotStore;
use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
struct StoredEntry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// In-memory snapshot store adapter.
///
/// Beyond the [`SnapshotStore`] contract it exposes test hooks:
/// [`advance`](Self::advance) shifts the store's notion of now so expiry
/// can be exercised without sleeping, and
/// [`set_unavailable`](Self::set_unavailable) /
/// [`fail_key`](Self::fail_key) inject faults so callers' degraded paths
/// can be driven.
pub struct InMemorySnapshotStore {
    entries: RwLock<HashMap<(String, String), StoredEntry>>,
    offset: RwLock<ChronoDuration>,
    unavailable: AtomicBool,
    failing_keys: RwLock<HashSet<(String, String)>>,
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            offset: RwLock::new(ChronoDuration::zero()),
            unavailable: AtomicBool::new(false),
            failing_keys: RwLock::new(HashSet::new()),
        }
    }
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift this store's clock forward. Entries whose TTL falls inside
    /// the shift read as absent afterwards.
    pub fn advance(&self, by: Duration) {
        let Ok(by) = ChronoDuration::from_std(by) else {
            return;
        };
        let mut offset = self.offset.write();
        *offset = *offset + by;
    }

    /// Make every subsequent operation fail with
    /// [`StorageError::Unavailable`] until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make writes to one specific entry fail while other entries keep
    /// working.
    pub fn fail_key(&self, namespace: &str, key: &str) {
        self.failing_keys
            .write()
            .insert((namespace.to_string(), key.to_string()));
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = self.now();
        self.entries
            .read()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now() + *self.offset.read()
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> StorageResult<Option<serde_json::Value>> {
        self.check_available()?;

        let lookup = (namespace.to_string(), key.to_string());
        let now = self.now();

        let mut entries = self.entries.write();
        match entries.get(&lookup) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                // Expired; drop lazily on read.
                entries.remove(&lookup);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> StorageResult<()> {
        self.check_available()?;

        let lookup = (namespace.to_string(), key.to_string());
        if self.failing_keys.read().contains(&lookup) {
            return Err(StorageError::Backend(format!(
                "write rejected for {}/{}",
                namespace, key
            )));
        }

        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|e| StorageError::Backend(format!("ttl out of range: {}", e)))?;
        let entry = StoredEntry {
            value,
            expires_at: self.now() + ttl,
        };

        self.entries.write().insert(lookup, entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = InMemorySnapshotStore::new();
        store
            .set("monitoring", "t1:metrics", json!({"n": 1}), Duration::from_secs(60))
            .await
            .unwrap();

        let value = store.get("monitoring", "t1:metrics").await.unwrap();
        assert_eq!(value, Some(json!({"n": 1})));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = InMemorySnapshotStore::new();
        store
            .set("monitoring", "k", json!(1), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(store.get("billing", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let store = InMemorySnapshotStore::new();
        store
            .set("monitoring", "k", json!(1), Duration::from_secs(60))
            .await
            .unwrap();

        store.advance(Duration::from_secs(61));
        assert!(store.get("monitoring", "k").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_errors() {
        let store = InMemorySnapshotStore::new();
        store.set_unavailable(true);

        let err = store.get("monitoring", "k").await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));

        let err = store
            .set("monitoring", "k", json!(1), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));

        store.set_unavailable(false);
        assert!(store.get("monitoring", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_single_key_fault() {
        let store = InMemorySnapshotStore::new();
        store.fail_key("monitoring", "bad");

        let err = store
            .set("monitoring", "bad", json!(1), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));

        store
            .set("monitoring", "good", json!(2), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_refreshes_ttl() {
        let store = InMemorySnapshotStore::new();
        store
            .set("monitoring", "k", json!(1), Duration::from_secs(10))
            .await
            .unwrap();
        store.advance(Duration::from_secs(8));
        store
            .set("monitoring", "k", json!(2), Duration::from_secs(10))
            .await
            .unwrap();
        store.advance(Duration::from_secs(8));

        // 16s after the first write, the refreshed entry is still live.
        assert_eq!(store.get("monitoring", "k").await.unwrap(), Some(json!(2)));
    }
}
