//! Shared types for the PULSE metrics engine.
//!
//! This crate defines the value types exchanged between the collection
//! engine, its storage collaborator, and the read API consumers:
//!
//! - [`TenantId`]: opaque tenant identifier
//! - [`RequestOutcome`]: one completed request, as reported by the
//!   request-handling layer
//! - [`WindowStats`] / [`AggregatedMetrics`]: derived statistics over
//!   trailing time windows
//! - [`TenantReport`] / [`PlatformSummary`]: anomaly-scan and fleet
//!   roll-up views
//!
//! Everything here is serde-serializable; snapshot payloads written to the
//! external store round-trip through these types.

pub mod ids;
pub mod outcome;
pub mod stats;

pub use ids::TenantId;
pub use outcome::RequestOutcome;
pub use stats::{
    AggregatedMetrics, PlatformSummary, TenantReport, TenantUsage, WindowStats,
};
