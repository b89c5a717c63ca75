//! Anomaly scan over per-tenant statistics.

use pulse_types::{TenantId, TenantReport, WindowStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Operational thresholds for the anomaly scan.
///
/// Every comparison is strict: a value sitting exactly on a threshold does
/// not raise an issue. Defaults are the fleet-wide operative values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    /// Error-rate ceiling, percent.
    pub max_error_rate_percent: f64,

    /// Mean-response ceiling, milliseconds.
    pub max_avg_response_millis: u64,

    /// Throughput ceiling, requests per minute.
    pub max_requests_per_minute: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            max_error_rate_percent: 10.0,
            max_avg_response_millis: 1000,
            max_requests_per_minute: 100.0,
        }
    }
}

/// Evaluate each tenant's 1-hour statistics against `thresholds` and
/// report tenants with at least one issue, most-issues first. Tenants at
/// the same issue count carry no particular order.
pub fn scan_for_issues(
    stats_by_tenant: HashMap<TenantId, WindowStats>,
    thresholds: &AnomalyThresholds,
) -> Vec<TenantReport> {
    let mut reports = Vec::new();

    for (tenant_id, stats) in stats_by_tenant {
        let mut issues = Vec::new();

        if stats.error_rate_percent > thresholds.max_error_rate_percent {
            issues.push(format!("high error rate: {}%", stats.error_rate_percent));
        }
        if stats.avg_response_millis > thresholds.max_avg_response_millis {
            issues.push(format!(
                "slow response time: {}ms",
                stats.avg_response_millis
            ));
        }
        if stats.requests_per_minute > thresholds.max_requests_per_minute {
            issues.push(format!(
                "high request rate: {} req/min",
                stats.requests_per_minute
            ));
        }

        if !issues.is_empty() {
            reports.push(TenantReport {
                tenant_id,
                stats,
                issues,
            });
        }
    }

    reports.sort_by(|a, b| b.issues.len().cmp(&a.issues.len()));
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stats(error_rate: f64, avg_millis: u64, per_minute: f64) -> WindowStats {
        WindowStats {
            error_rate_percent: error_rate,
            avg_response_millis: avg_millis,
            requests_per_minute: per_minute,
            ..WindowStats::empty(Utc::now())
        }
    }

    fn scan_one(s: WindowStats) -> Vec<TenantReport> {
        let mut map = HashMap::new();
        map.insert(TenantId::new("t"), s);
        scan_for_issues(map, &AnomalyThresholds::default())
    }

    #[test]
    fn test_healthy_tenant_is_excluded() {
        assert!(scan_one(stats(1.0, 200, 10.0)).is_empty());
    }

    #[test]
    fn test_error_rate_boundary_is_strict() {
        assert!(scan_one(stats(10.0, 0, 0.0)).is_empty());

        let reports = scan_one(stats(10.01, 0, 0.0));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].issues, vec!["high error rate: 10.01%"]);
    }

    #[test]
    fn test_response_time_boundary_is_strict() {
        assert!(scan_one(stats(0.0, 1000, 0.0)).is_empty());

        let reports = scan_one(stats(0.0, 1001, 0.0));
        assert_eq!(reports[0].issues, vec!["slow response time: 1001ms"]);
    }

    #[test]
    fn test_request_rate_boundary_is_strict() {
        assert!(scan_one(stats(0.0, 0, 100.0)).is_empty());

        let reports = scan_one(stats(0.0, 0, 100.01));
        assert_eq!(reports[0].issues, vec!["high request rate: 100.01 req/min"]);
    }

    #[test]
    fn test_multi_issue_tenant_ranks_first() {
        let mut map = HashMap::new();
        // Two issues: error rate and response time.
        map.insert(TenantId::new("x"), stats(15.0, 1200, 50.0));
        // One issue: error rate.
        map.insert(TenantId::new("y"), stats(50.0, 100, 10.0));

        let reports = scan_for_issues(map, &AnomalyThresholds::default());
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].tenant_id, TenantId::new("x"));
        assert_eq!(reports[0].issues.len(), 2);
        assert_eq!(reports[1].tenant_id, TenantId::new("y"));
        assert_eq!(reports[1].issues.len(), 1);
    }

    #[test]
    fn test_all_applicable_issues_reported_together() {
        let reports = scan_one(stats(20.0, 2000, 150.0));
        assert_eq!(reports[0].issues.len(), 3);
    }
}
