use crate::StorageResult;
use async_trait::async_trait;
use std::time::Duration;

/// Namespaced key-value store with per-entry TTL.
///
/// Implementations must be safe for concurrent use; the engine issues
/// reads and writes from request-serving tasks and the flush scheduler
/// without additional locking.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Look up an entry. Expired entries read as absent.
    async fn get(&self, namespace: &str, key: &str)
        -> StorageResult<Option<serde_json::Value>>;

    /// Insert or replace an entry with the given time-to-live.
    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> StorageResult<()>;
}
