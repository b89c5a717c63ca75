//! # PULSE Engine - Per-tenant Metrics Collection and Anomaly Detection
//!
//! In-process engine that records every request outcome per tenant,
//! maintains bounded history, serves windowed aggregates (1h/24h/7d), and
//! flags tenants crossing operational thresholds.
//!
//! ## Key Components
//!
//! - [`Collector`]: the facade the process talks to - record outcomes,
//!   read aggregates, scan for anomalies, drive the flush scheduler
//! - [`MetricBuffer`]: bounded per-tenant history with FIFO eviction
//! - [`TenantRegistry`]: one buffer per tenant, created on first use
//! - [`window::aggregate`]: pure windowed reduction (percentiles, rates)
//! - [`scan_for_issues`]: threshold evaluation over the 1-hour stats
//!
//! Aggregates are cached through the platform's snapshot store
//! ([`pulse_storage::SnapshotStore`]); a periodic flush task persists
//! last-known-good snapshots and trims each buffer to the retention
//! horizon.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::Utc;
//! use pulse_engine::{Collector, CollectorConfig};
//! use pulse_storage::InMemorySnapshotStore;
//! use pulse_types::{RequestOutcome, TenantId};
//!
//! # async fn example() {
//! let store = Arc::new(InMemorySnapshotStore::new());
//! let collector = Arc::new(Collector::new(CollectorConfig::default(), store));
//!
//! // Record a completed request.
//! let tenant = TenantId::new("clinic-042");
//! let outcome = RequestOutcome::new("GET", "/api/patients", 200, 38, Utc::now());
//! collector.record(&tenant, outcome).unwrap();
//!
//! // Read aggregates and scan the fleet.
//! let metrics = collector.get_metrics(&tenant).await;
//! println!("p95: {}ms", metrics.last_hour.p95_response_millis);
//! for report in collector.get_anomalies() {
//!     println!("{}: {:?}", report.tenant_id, report.issues);
//! }
//!
//! // Periodic snapshot + trim.
//! Arc::clone(&collector)
//!     .start_flush_scheduler(std::time::Duration::from_secs(60))
//!     .unwrap();
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Each tenant's buffer is the unit of mutual exclusion; two tenants never
//! contend on the same lock. Recording touches in-memory state only and
//! never blocks on I/O. Reads that miss the cache perform one store write;
//! they are off the request hot path. The flush task cancels cooperatively
//! between tenants.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod buffer;
pub mod cache;
pub mod clock;
pub mod collector;
pub mod config;
pub mod error;
pub mod registry;
pub mod scanner;
mod scheduler;
pub mod window;

pub use buffer::MetricBuffer;
pub use cache::SnapshotCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collector::Collector;
pub use config::CollectorConfig;
pub use error::{EngineError, EngineResult};
pub use registry::TenantRegistry;
pub use scanner::{scan_for_issues, AnomalyThresholds};
