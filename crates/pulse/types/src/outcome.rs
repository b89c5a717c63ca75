//! Request outcome records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed request, as reported by the request-handling layer.
///
/// Immutable once created. Timestamps within a single tenant's history are
/// normally non-decreasing, but concurrent writers may interleave slightly
/// out of order; consumers must not assume strict ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOutcome {
    /// Instant the request completed.
    pub timestamp: DateTime<Utc>,

    /// Wall-clock processing time in milliseconds.
    pub duration_millis: u64,

    /// HTTP-style status code; `>= 400` classifies the outcome as an error.
    pub status_code: u16,

    /// Request method, free-form.
    pub method: String,

    /// Request path, free-form. Never parsed by the engine.
    pub path: String,

    /// Error description, present only for error outcomes.
    pub error_detail: Option<String>,
}

impl RequestOutcome {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        status_code: u16,
        duration_millis: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            duration_millis,
            status_code,
            method: method.into(),
            path: path.into(),
            error_detail: None,
        }
    }

    /// Attach an error description. Meaningful only for error outcomes;
    /// the detail is ignored by aggregation either way.
    pub fn with_error_detail(mut self, detail: impl Into<String>) -> Self {
        self.error_detail = Some(detail.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let ok = RequestOutcome::new("GET", "/patients", 200, 12, Utc::now());
        assert!(!ok.is_error());

        let client_err = RequestOutcome::new("GET", "/patients", 400, 5, Utc::now());
        assert!(client_err.is_error());

        let server_err = RequestOutcome::new("POST", "/orders", 503, 30, Utc::now())
            .with_error_detail("upstream unavailable");
        assert!(server_err.is_error());
        assert_eq!(
            server_err.error_detail.as_deref(),
            Some("upstream unavailable")
        );
    }
}
