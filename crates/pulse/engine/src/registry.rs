//! Tenant registry.
//!
//! Owns one [`MetricBuffer`] per tenant. Lookups take the sharded-map fast
//! path; only first-use creation takes a short exclusive section.

use dashmap::DashMap;
use pulse_types::TenantId;
use std::sync::Arc;

use crate::buffer::MetricBuffer;

/// Thread-safe map of tenant id to that tenant's history buffer.
///
/// Entries are created lazily on first record and never removed; a
/// deactivated tenant simply stops receiving records and its history ages
/// out through trimming.
pub struct TenantRegistry {
    buffers: DashMap<TenantId, Arc<MetricBuffer>>,
    buffer_capacity: usize,
}

impl TenantRegistry {
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            buffers: DashMap::new(),
            buffer_capacity,
        }
    }

    /// Existing buffer for a tenant, if any. Read path; never creates.
    pub fn buffer(&self, tenant_id: &TenantId) -> Option<Arc<MetricBuffer>> {
        self.buffers.get(tenant_id).map(|b| Arc::clone(&b))
    }

    /// Buffer for a tenant, created atomically on first use. Concurrent
    /// callers racing on the same id all receive the same buffer; a split
    /// history would silently lose records.
    pub fn buffer_or_create(&self, tenant_id: &TenantId) -> Arc<MetricBuffer> {
        self.buffers
            .entry(tenant_id.clone())
            .or_insert_with(|| Arc::new(MetricBuffer::new(self.buffer_capacity)))
            .clone()
    }

    /// Snapshot of currently known tenant identifiers.
    pub fn tenant_ids(&self) -> Vec<TenantId> {
        self.buffers.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse_types::RequestOutcome;

    #[test]
    fn test_create_on_first_use() {
        let registry = TenantRegistry::new(8);
        let tenant = TenantId::new("clinic-1");

        assert!(registry.buffer(&tenant).is_none());
        let buffer = registry.buffer_or_create(&tenant);
        assert!(buffer.is_empty());
        assert_eq!(registry.len(), 1);

        let again = registry.buffer_or_create(&tenant);
        assert!(Arc::ptr_eq(&buffer, &again));
    }

    #[test]
    fn test_concurrent_creation_yields_one_buffer() {
        let registry = Arc::new(TenantRegistry::new(64));
        let tenant = TenantId::new("clinic-racy");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let tenant = tenant.clone();
                std::thread::spawn(move || {
                    let buffer = registry.buffer_or_create(&tenant);
                    buffer.append(RequestOutcome::new("GET", "/x", 200, 1, Utc::now()));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1);
        // Every append landed in the same buffer.
        assert_eq!(registry.buffer(&tenant).unwrap().len(), 8);
    }

    #[test]
    fn test_tenant_ids_enumeration() {
        let registry = TenantRegistry::new(8);
        registry.buffer_or_create(&TenantId::new("a"));
        registry.buffer_or_create(&TenantId::new("b"));

        let mut ids = registry.tenant_ids();
        ids.sort();
        assert_eq!(ids, vec![TenantId::new("a"), TenantId::new("b")]);
    }
}
