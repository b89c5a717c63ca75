//! Derived statistics and roll-up views.
//!
//! These are immutable snapshots computed from a tenant's retained history.
//! The engine produces them; dashboards and the anomaly scanner consume
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::TenantId;

/// Summary statistics over one trailing time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Number of requests in the window.
    pub request_count: u64,

    /// Number of error outcomes (status >= 400) in the window.
    pub error_count: u64,

    /// Sum of request durations in the window, milliseconds.
    pub total_duration_millis: u64,

    /// Mean duration, integer milliseconds.
    pub avg_response_millis: u64,

    /// 95th-percentile duration (nearest-rank), milliseconds.
    pub p95_response_millis: u64,

    /// 99th-percentile duration (nearest-rank), milliseconds.
    pub p99_response_millis: u64,

    /// Error share of the window, percent, two decimals.
    pub error_rate_percent: f64,

    /// Throughput over the observed first-to-last span, two decimals.
    ///
    /// Derived from the span of retained records; sparse traffic produces
    /// volatile figures (two requests one second apart read as 120/min).
    pub requests_per_minute: f64,

    /// Instant this snapshot was produced.
    pub computed_at: DateTime<Utc>,
}

impl WindowStats {
    /// Zero-valued stats for an empty window.
    pub fn empty(computed_at: DateTime<Utc>) -> Self {
        Self {
            request_count: 0,
            error_count: 0,
            total_duration_millis: 0,
            avg_response_millis: 0,
            p95_response_millis: 0,
            p99_response_millis: 0,
            error_rate_percent: 0.0,
            requests_per_minute: 0.0,
            computed_at,
        }
    }
}

/// Per-tenant statistics over the three supported windows, all computed
/// from the same history snapshot at the same instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub tenant_id: TenantId,
    pub last_hour: WindowStats,
    pub last_day: WindowStats,
    pub last_week: WindowStats,
}

/// One unhealthy tenant, as reported by the anomaly scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantReport {
    pub tenant_id: TenantId,

    /// The 1-hour stats the issues were evaluated against.
    pub stats: WindowStats,

    /// Human-readable issue descriptions; never empty in a report.
    pub issues: Vec<String>,
}

/// Fleet-wide roll-up over all tenants' 1-hour statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSummary {
    pub total_tenants: usize,
    pub total_requests: u64,
    pub total_errors: u64,

    /// Request-weighted mean duration across the fleet, integer millis.
    pub avg_response_millis: u64,

    /// Fleet-wide error share, percent, two decimals.
    pub error_rate_percent: f64,

    /// Tenants with at least one open issue.
    pub problematic_count: usize,

    /// Tenants with no open issues.
    pub healthy_count: usize,
}

/// Lifetime usage counters for one tenant.
///
/// Monotonic since process start; never trimmed with the windowed history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantUsage {
    pub request_count: u64,
    pub error_count: u64,

    /// Read-path snapshot-cache hits attributed to this tenant.
    pub cache_hits: u64,

    /// Detail of the most recent error outcome, if any.
    pub last_error: Option<String>,
}
