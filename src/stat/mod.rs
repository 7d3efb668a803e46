//! Metric source contracts.
//!
//! # Data Flow
//! ```text
//! Guarded call completes (owned by the embedding runtime):
//!     → ResourceNode records pass/block/error/complete + latency
//!     → sliding window aggregates per resource
//!
//! Admission check:
//!     breaker → ResourceRegistry::get_resource_node(resource)
//!     → ResourceNode::get_or_create_sliding_window_metric(sample_count, interval_ms)
//!     → ReadStat (avg_rt, qps per event)
//! ```
//!
//! # Design Decisions
//! - Breakers only read; recording outcomes is a separate path
//! - Window aggregation lives behind `ReadStat`, never inside this crate
//! - Reads are expected to be O(1) and non-blocking

pub mod registry;

use std::fmt;
use std::sync::Arc;

pub use registry::NodeRegistry;

/// Kind of request outcome tracked by a sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricEvent {
    /// Request admitted.
    Pass,
    /// Request rejected by a flow-control check.
    Block,
    /// Admitted request finished with a business error.
    Error,
    /// Admitted request finished (successfully or not).
    Complete,
}

impl fmt::Display for MetricEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricEvent::Pass => "pass",
            MetricEvent::Block => "block",
            MetricEvent::Error => "error",
            MetricEvent::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Read-only aggregated view of recent outcomes for one resource.
pub trait ReadStat: Send + Sync {
    /// Average response time (milliseconds) over the window.
    fn avg_rt(&self) -> f64;

    /// Per-second rate of the given event over the window.
    fn qps(&self, event: MetricEvent) -> f64;
}

/// Statistic node of a single resource.
pub trait ResourceNode: Send + Sync {
    /// Return the window metric with the given shape, creating it on first use.
    fn get_or_create_sliding_window_metric(
        &self,
        sample_count: u32,
        interval_ms: u32,
    ) -> Arc<dyn ReadStat>;
}

/// Lookup of resource nodes by resource name.
pub trait ResourceRegistry: Send + Sync {
    /// Return the node for `resource`, if it has produced traffic yet.
    fn get_resource_node(&self, resource: &str) -> Option<Arc<dyn ResourceNode>>;
}
