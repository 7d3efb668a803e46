//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! breaker subsystem produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (trip/recovery/block counters, active rule gauge)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Metric updates go through the `metrics` facade; without an installed
//!   recorder they are no-ops
//! - RUST_LOG overrides the configured log level

pub mod logging;
pub mod metrics;
