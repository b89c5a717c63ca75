//! Collector configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scanner::AnomalyThresholds;

/// Configuration for the metrics collector.
///
/// Defaults carry the operative production values; deployments override
/// individual fields rather than rebuilding the whole struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Maximum retained outcomes per tenant before FIFO eviction.
    pub buffer_capacity: usize,

    /// Horizon beyond which retained outcomes are trimmed. Matches the
    /// longest supported aggregation window.
    pub retention: Duration,

    /// TTL for the read-path metrics cache.
    pub read_cache_ttl: Duration,

    /// TTL for the periodically persisted last-known-good snapshot.
    pub snapshot_ttl: Duration,

    /// Interval between flush scheduler ticks.
    pub flush_interval: Duration,

    /// Thresholds the anomaly scan evaluates against.
    pub thresholds: AnomalyThresholds,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 1000,
            retention: Duration::from_secs(7 * 24 * 60 * 60),
            read_cache_ttl: Duration::from_secs(60),
            snapshot_ttl: Duration::from_secs(60 * 60),
            flush_interval: Duration::from_secs(60),
            thresholds: AnomalyThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.buffer_capacity, 1000);
        assert_eq!(config.retention, Duration::from_secs(604_800));
        assert_eq!(config.read_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.flush_interval, Duration::from_secs(60));
    }
}
