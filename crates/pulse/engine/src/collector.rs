//! Collector facade.
//!
//! The single entry point the rest of the process talks to: record an
//! outcome, read aggregates, scan for anomalies, and drive the flush
//! scheduler lifecycle. Constructed explicitly at the composition root and
//! shared behind an `Arc`; there is no process-wide singleton.

use chrono::Duration as ChronoDuration;
use dashmap::DashMap;
use parking_lot::Mutex;
use pulse_storage::SnapshotStore;
use pulse_types::{
    AggregatedMetrics, PlatformSummary, RequestOutcome, TenantId, TenantReport, TenantUsage,
    WindowStats,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cache::SnapshotCache;
use crate::clock::{Clock, SystemClock};
use crate::config::CollectorConfig;
use crate::error::{EngineError, EngineResult};
use crate::registry::TenantRegistry;
use crate::scanner::scan_for_issues;
use crate::scheduler::FlushTask;
use crate::window::{aggregate, round2};

/// Lifetime usage counters for one tenant. Cheap atomic increments on the
/// record path, separate from the windowed history.
#[derive(Default)]
struct UsageCell {
    requests: AtomicU64,
    errors: AtomicU64,
    cache_hits: AtomicU64,
    last_error: Mutex<Option<String>>,
}

/// Per-tenant metrics collection and anomaly-detection engine.
pub struct Collector {
    config: CollectorConfig,
    registry: TenantRegistry,
    cache: SnapshotCache,
    clock: Arc<dyn Clock>,
    usage: DashMap<TenantId, UsageCell>,
    scheduler: Mutex<Option<FlushTask>>,
}

impl Collector {
    /// Collector on the wall clock.
    pub fn new(config: CollectorConfig, store: Arc<dyn SnapshotStore>) -> Self {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Collector with an injected clock, for deterministic tests.
    pub fn with_clock(
        config: CollectorConfig,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = SnapshotCache::new(store, config.read_cache_ttl);
        let registry = TenantRegistry::new(config.buffer_capacity);
        Self {
            config,
            registry,
            cache,
            clock,
            usage: DashMap::new(),
            scheduler: Mutex::new(None),
        }
    }

    /// Record one completed request for a tenant.
    ///
    /// In-memory only and non-blocking with respect to I/O; safe to call
    /// from the request path. Invalid input is rejected with an error the
    /// caller may log and drop; it must never fail the original request.
    pub fn record(&self, tenant_id: &TenantId, outcome: RequestOutcome) -> EngineResult<()> {
        if tenant_id.is_empty() {
            warn!("dropping outcome recorded without a tenant id");
            return Err(EngineError::EmptyTenantId);
        }

        self.note_request(tenant_id, &outcome);
        self.registry.buffer_or_create(tenant_id).append(outcome);
        Ok(())
    }

    /// Aggregates for one tenant over the three supported windows.
    ///
    /// Served from the snapshot cache when fresh; otherwise computed from
    /// the tenant's history and written through. Never fails: a store
    /// outage degrades to compute-fresh, and an unknown tenant reads as
    /// zero-valued windows.
    pub async fn get_metrics(&self, tenant_id: &TenantId) -> AggregatedMetrics {
        if let Some(metrics) = self.cache.get(tenant_id).await {
            if let Some(cell) = self.usage.get(tenant_id) {
                cell.cache_hits.fetch_add(1, Ordering::Relaxed);
            }
            return metrics;
        }

        let metrics = self.compute_metrics(tenant_id);
        self.cache.put(tenant_id, &metrics).await;
        metrics
    }

    /// 1-hour statistics for every known tenant, computed directly from
    /// the buffers. The fleet-wide scanning path.
    pub fn get_all_metrics(&self) -> HashMap<TenantId, WindowStats> {
        let now = self.clock.now();
        let hour_ago = now - ChronoDuration::hours(1);

        self.registry
            .tenant_ids()
            .into_iter()
            .filter_map(|tenant_id| {
                let buffer = self.registry.buffer(&tenant_id)?;
                let stats = aggregate(&buffer.snapshot(), hour_ago, now);
                Some((tenant_id, stats))
            })
            .collect()
    }

    /// Tenants currently crossing operational thresholds, most issues
    /// first.
    pub fn get_anomalies(&self) -> Vec<TenantReport> {
        scan_for_issues(self.get_all_metrics(), &self.config.thresholds)
    }

    /// Fleet-wide roll-up of the 1-hour statistics.
    pub fn get_summary(&self) -> PlatformSummary {
        let all = self.get_all_metrics();
        let problematic_count =
            scan_for_issues(all.clone(), &self.config.thresholds).len();

        let total_tenants = all.len();
        let total_requests: u64 = all.values().map(|s| s.request_count).sum();
        let total_errors: u64 = all.values().map(|s| s.error_count).sum();
        let total_duration: u64 = all.values().map(|s| s.total_duration_millis).sum();

        let avg_response_millis = if total_requests > 0 {
            total_duration / total_requests
        } else {
            0
        };
        let error_rate_percent = if total_requests > 0 {
            round2(total_errors as f64 / total_requests as f64 * 100.0)
        } else {
            0.0
        };

        PlatformSummary {
            total_tenants,
            total_requests,
            total_errors,
            avg_response_millis,
            error_rate_percent,
            problematic_count,
            healthy_count: total_tenants - problematic_count,
        }
    }

    /// Lifetime usage counters for a tenant, if it has recorded anything.
    pub fn usage(&self, tenant_id: &TenantId) -> Option<TenantUsage> {
        self.usage.get(tenant_id).map(|cell| TenantUsage {
            request_count: cell.requests.load(Ordering::Relaxed),
            error_count: cell.errors.load(Ordering::Relaxed),
            cache_hits: cell.cache_hits.load(Ordering::Relaxed),
            last_error: cell.last_error.lock().clone(),
        })
    }

    /// Start the periodic flush task. Errors if one is already running.
    pub fn start_flush_scheduler(self: Arc<Self>, interval: Duration) -> EngineResult<()> {
        if interval.is_zero() {
            return Err(EngineError::InvalidFlushInterval);
        }

        let mut slot = self.scheduler.lock();
        if slot.is_some() {
            return Err(EngineError::SchedulerAlreadyRunning);
        }

        *slot = Some(FlushTask::spawn(Arc::clone(&self), interval));
        info!(interval_secs = interval.as_secs(), "flush scheduler started");
        Ok(())
    }

    /// Stop the flush task and wait for it to wind down. Idempotent; a
    /// no-op when nothing is running.
    pub async fn stop_flush_scheduler(&self) {
        let task = self.scheduler.lock().take();
        if let Some(task) = task {
            task.stop().await;
            info!("flush scheduler stopped");
        }
    }

    /// Run one flush pass inline: persist every tenant's snapshot and trim
    /// its history to the retention horizon.
    pub async fn flush_now(&self) {
        self.flush_pass(None).await;
    }

    /// One pass over all tenants. A single tenant's persist failure is
    /// logged and does not stop the rest; the next pass naturally retries.
    /// When a stop signal is supplied, it is checked between tenants.
    pub(crate) async fn flush_pass(&self, stop: Option<&watch::Receiver<bool>>) {
        let cutoff = self.clock.now() - to_chrono(self.config.retention);

        for tenant_id in self.registry.tenant_ids() {
            if stop.map(|s| *s.borrow()).unwrap_or(false) {
                info!("flush pass cancelled mid-iteration");
                return;
            }

            let metrics = self.compute_metrics(&tenant_id);
            if let Err(e) = self
                .cache
                .persist(&tenant_id, &metrics, self.config.snapshot_ttl)
                .await
            {
                warn!(
                    tenant_id = %tenant_id,
                    error = %e,
                    "snapshot not persisted this cycle"
                );
            }

            if let Some(buffer) = self.registry.buffer(&tenant_id) {
                buffer.trim_older_than(cutoff);
            }
        }
    }

    /// Three-window aggregates from one history snapshot at one instant.
    fn compute_metrics(&self, tenant_id: &TenantId) -> AggregatedMetrics {
        let snapshot = self
            .registry
            .buffer(tenant_id)
            .map(|b| b.snapshot())
            .unwrap_or_default();
        let now = self.clock.now();

        AggregatedMetrics {
            tenant_id: tenant_id.clone(),
            last_hour: aggregate(&snapshot, now - ChronoDuration::hours(1), now),
            last_day: aggregate(&snapshot, now - ChronoDuration::hours(24), now),
            last_week: aggregate(&snapshot, now - ChronoDuration::days(7), now),
        }
    }

    fn note_request(&self, tenant_id: &TenantId, outcome: &RequestOutcome) {
        let cell = self.usage.entry(tenant_id.clone()).or_default();
        cell.requests.fetch_add(1, Ordering::Relaxed);
        if outcome.is_error() {
            cell.errors.fetch_add(1, Ordering::Relaxed);
            if let Some(detail) = &outcome.error_detail {
                *cell.last_error.lock() = Some(detail.clone());
            }
        }
    }
}

fn to_chrono(duration: Duration) -> ChronoDuration {
    // An out-of-range retention trims nothing rather than panicking.
    ChronoDuration::from_std(duration).unwrap_or_else(|_| ChronoDuration::days(36_500))
}
