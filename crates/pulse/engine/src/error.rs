//! Error types for the pulse-engine crate.

use thiserror::Error;

/// Errors surfaced by the collection engine.
///
/// Recording is best-effort: these are returned to the caller for logging
/// and never panic the request path. Store failures are handled internally
/// (degraded reads, skipped persists) and do not appear here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An empty tenant identifier was passed to the recording API.
    #[error("empty tenant id")]
    EmptyTenantId,

    /// The flush scheduler is already running.
    #[error("flush scheduler already running")]
    SchedulerAlreadyRunning,

    /// A zero flush interval was requested.
    #[error("flush interval must be non-zero")]
    InvalidFlushInterval,
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
