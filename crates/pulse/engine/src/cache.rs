//! Read-through snapshot cache.
//!
//! Wraps the external snapshot store so bursts of dashboard reads are
//! served from a short-TTL cached copy instead of recomputing aggregates.
//! Store outages degrade to the compute-fresh path; they never surface to
//! the reader.

use pulse_storage::{SnapshotStore, StorageError, StorageResult};
use pulse_types::{AggregatedMetrics, TenantId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Store namespace shared by the read cache and persisted snapshots.
const NAMESPACE: &str = "monitoring";

/// Write-through cache of computed aggregates, keyed per tenant.
pub struct SnapshotCache {
    store: Arc<dyn SnapshotStore>,
    read_ttl: Duration,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn SnapshotStore>, read_ttl: Duration) -> Self {
        Self { store, read_ttl }
    }

    fn read_key(tenant_id: &TenantId) -> String {
        format!("{}:metrics", tenant_id)
    }

    fn snapshot_key(tenant_id: &TenantId) -> String {
        format!("{}:snapshot", tenant_id)
    }

    /// Cached metrics for a tenant. `None` on miss, store outage, or a
    /// payload that no longer decodes; all three mean "compute fresh".
    pub async fn get(&self, tenant_id: &TenantId) -> Option<AggregatedMetrics> {
        match self.store.get(NAMESPACE, &Self::read_key(tenant_id)).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(metrics) => Some(metrics),
                Err(e) => {
                    debug!(
                        tenant_id = %tenant_id,
                        error = %e,
                        "cached metrics payload did not decode; recomputing"
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(
                    tenant_id = %tenant_id,
                    error = %e,
                    "snapshot store read failed; serving freshly computed metrics"
                );
                None
            }
        }
    }

    /// Best-effort write-through of freshly computed metrics. Failures are
    /// logged and swallowed; the read that triggered this already has its
    /// value.
    pub async fn put(&self, tenant_id: &TenantId, metrics: &AggregatedMetrics) {
        let value = match serde_json::to_value(metrics) {
            Ok(value) => value,
            Err(e) => {
                warn!(tenant_id = %tenant_id, error = %e, "metrics did not serialize");
                return;
            }
        };

        if let Err(e) = self
            .store
            .set(NAMESPACE, &Self::read_key(tenant_id), value, self.read_ttl)
            .await
        {
            warn!(tenant_id = %tenant_id, error = %e, "snapshot cache write failed");
        }
    }

    /// Persist a last-known-good snapshot under its own key and TTL.
    /// Errors propagate so the flush scheduler can log them with tenant
    /// context and move on.
    pub async fn persist(
        &self,
        tenant_id: &TenantId,
        metrics: &AggregatedMetrics,
        ttl: Duration,
    ) -> StorageResult<()> {
        let value = serde_json::to_value(metrics)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store
            .set(NAMESPACE, &Self::snapshot_key(tenant_id), value, ttl)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse_storage::InMemorySnapshotStore;
    use pulse_types::WindowStats;

    fn metrics(tenant: &TenantId) -> AggregatedMetrics {
        let now = Utc::now();
        AggregatedMetrics {
            tenant_id: tenant.clone(),
            last_hour: WindowStats::empty(now),
            last_day: WindowStats::empty(now),
            last_week: WindowStats::empty(now),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let cache = SnapshotCache::new(store, Duration::from_secs(60));
        let tenant = TenantId::new("t1");

        assert!(cache.get(&tenant).await.is_none());

        let m = metrics(&tenant);
        cache.put(&tenant, &m).await;
        assert_eq!(cache.get(&tenant).await, Some(m));
    }

    #[tokio::test]
    async fn test_get_degrades_on_outage() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let cache = SnapshotCache::new(Arc::clone(&store) as _, Duration::from_secs(60));
        let tenant = TenantId::new("t1");

        cache.put(&tenant, &metrics(&tenant)).await;
        store.set_unavailable(true);

        assert!(cache.get(&tenant).await.is_none());
    }

    #[tokio::test]
    async fn test_put_swallows_store_errors() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store.set_unavailable(true);
        let cache = SnapshotCache::new(Arc::clone(&store) as _, Duration::from_secs(60));
        let tenant = TenantId::new("t1");

        // Must not panic or propagate.
        cache.put(&tenant, &metrics(&tenant)).await;
    }

    #[tokio::test]
    async fn test_persist_uses_distinct_key() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let cache = SnapshotCache::new(Arc::clone(&store) as _, Duration::from_secs(60));
        let tenant = TenantId::new("t1");

        cache
            .persist(&tenant, &metrics(&tenant), Duration::from_secs(3600))
            .await
            .unwrap();

        // The persisted snapshot is not visible to the read cache.
        assert!(cache.get(&tenant).await.is_none());
        assert!(store
            .get("monitoring", "t1:snapshot")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_persist_propagates_store_errors() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store.fail_key("monitoring", "t1:snapshot");
        let cache = SnapshotCache::new(Arc::clone(&store) as _, Duration::from_secs(60));
        let tenant = TenantId::new("t1");

        let result = cache
            .persist(&tenant, &metrics(&tenant), Duration::from_secs(3600))
            .await;
        assert!(result.is_err());
    }
}
