//! Windowed aggregation over request outcomes.
//!
//! [`aggregate`] is a pure reduction: it filters a history snapshot to a
//! trailing window and derives counts, percentiles, and rates. Percentiles
//! come from a full re-sort on every call rather than an incremental
//! sketch; input is capacity-bounded and reads are cached, so the
//! O(n log n) cost stays trivial.

use chrono::{DateTime, Utc};
use pulse_types::{RequestOutcome, WindowStats};

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Nearest-rank index: `floor(len * q)`, clamped to the last element.
fn percentile_index(len: usize, q: f64) -> usize {
    ((len as f64 * q).floor() as usize).min(len - 1)
}

/// Reduce `records` restricted to `timestamp >= window_start` into summary
/// statistics. An empty window yields zero-valued stats.
pub fn aggregate(
    records: &[RequestOutcome],
    window_start: DateTime<Utc>,
    computed_at: DateTime<Utc>,
) -> WindowStats {
    let mut in_window: Vec<&RequestOutcome> = records
        .iter()
        .filter(|o| o.timestamp >= window_start)
        .collect();

    if in_window.is_empty() {
        return WindowStats::empty(computed_at);
    }

    let request_count = in_window.len() as u64;
    let error_count = in_window.iter().filter(|o| o.is_error()).count() as u64;
    let total_duration_millis: u64 = in_window.iter().map(|o| o.duration_millis).sum();
    let avg_response_millis = total_duration_millis / request_count;

    let mut durations: Vec<u64> = in_window.iter().map(|o| o.duration_millis).collect();
    durations.sort_unstable();
    let p95_response_millis = durations[percentile_index(durations.len(), 0.95)];
    let p99_response_millis = durations[percentile_index(durations.len(), 0.99)];

    let error_rate_percent = round2(error_count as f64 / request_count as f64 * 100.0);

    // Concurrent writers may land slightly out of order; sort before
    // taking the first/last span.
    let requests_per_minute = if in_window.len() < 2 {
        0.0
    } else {
        in_window.sort_by_key(|o| o.timestamp);
        let span_millis = (in_window[in_window.len() - 1].timestamp
            - in_window[0].timestamp)
            .num_milliseconds();
        let minutes = span_millis as f64 / 60_000.0;
        if minutes > 0.0 {
            round2(request_count as f64 / minutes)
        } else {
            0.0
        }
    };

    WindowStats {
        request_count,
        error_count,
        total_duration_millis,
        avg_response_millis,
        p95_response_millis,
        p99_response_millis,
        error_rate_percent,
        requests_per_minute,
        computed_at,
    }
}
