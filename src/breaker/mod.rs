//! Circuit breaking subsystem.
//!
//! # Data Flow
//! ```text
//! Rules activated (manager.rs):
//!     Rule[] → new_circuit_breaker() per rule
//!     → strategy picked once from Rule::strategy
//!     → table swapped in wholesale
//!
//! Admission (slot.rs → CircuitBreaker::try_pass):
//!     state.rs open?          → reject, no metric read
//!     metric.rs resolvable?   → no: admit (fail open)
//!     strategy formula        → admit, or
//!     recovery.rs trip (CAS)  → reject; winner spawns recovery timer
//!
//! Recovery (recovery.rs):
//!     sleep(recover_timeout) → reset debounce counter → close
//! ```
//!
//! # Design Decisions
//! - The tripped flag is the single source of truth for rejection
//! - No locks on the admission path; atomics and arc-swap only
//! - Recovery is blind and time based; there is no half-open probe
//! - Breakers are never mutated by reloads, only replaced

pub mod average_latency;
pub mod context;
pub mod error_count;
pub mod error_ratio;
pub mod manager;
pub mod metric;
pub mod recovery;
pub mod rule;
pub(crate) mod shared;
pub mod slot;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::Arc;

use crate::breaker::metric::MetricSlot;
use crate::breaker::shared::BreakerCore;
use crate::stat::{ReadStat, ResourceRegistry};

pub use average_latency::AverageLatencyBreaker;
pub use context::EntryContext;
pub use error_count::ErrorCountBreaker;
pub use error_ratio::ErrorRatioBreaker;
pub use manager::RuleManager;
pub use recovery::RecoveryScheduler;
pub use rule::{Rule, Strategy, StrategyKind};
pub use slot::{BlockInfo, CircuitBreakerSlot, TokenResult};
pub use state::BreakerState;

/// A circuit breaker guarding one resource under one rule.
///
/// `try_pass` may be called concurrently from any number of threads.
pub trait CircuitBreaker: Send + Sync + fmt::Debug {
    /// The immutable rule this breaker was built from.
    fn rule(&self) -> &Arc<Rule>;

    /// Admission decision: `true` admits the request, `false` rejects it.
    fn try_pass(&self, ctx: &EntryContext) -> bool;

    /// Open/closed flag and debounce counter.
    fn state(&self) -> &BreakerState;
}

/// Build the breaker for `rule`, resolving its metric through `registry`.
///
/// If the resource has no stat node yet, resolution is retried on each
/// admission check and requests are admitted until it succeeds.
pub fn new_circuit_breaker(
    rule: impl Into<Arc<Rule>>,
    registry: Arc<dyn ResourceRegistry>,
    scheduler: Arc<RecoveryScheduler>,
) -> Arc<dyn CircuitBreaker> {
    let rule = rule.into();
    let metric = MetricSlot::lazy(registry, &rule);
    build(rule, metric, scheduler)
}

/// Build the breaker for `rule` over an already-resolved metric.
pub fn new_circuit_breaker_with_metric(
    rule: impl Into<Arc<Rule>>,
    metric: Arc<dyn ReadStat>,
    scheduler: Arc<RecoveryScheduler>,
) -> Arc<dyn CircuitBreaker> {
    build(rule.into(), MetricSlot::resolved(metric), scheduler)
}

fn build(rule: Arc<Rule>, metric: MetricSlot, scheduler: Arc<RecoveryScheduler>) -> Arc<dyn CircuitBreaker> {
    let strategy = rule.strategy;
    let core = BreakerCore::new(rule, metric, scheduler);
    match strategy {
        Strategy::AverageLatency { slow_request_amount } => {
            Arc::new(AverageLatencyBreaker::new(core, slow_request_amount))
        }
        Strategy::ErrorRatio { min_request_amount } => {
            Arc::new(ErrorRatioBreaker::new(core, min_request_amount))
        }
        Strategy::ErrorCount => Arc::new(ErrorCountBreaker::new(core)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::testing::{scheduler, ScriptedStat};
    use crate::stat::NodeRegistry;

    #[test]
    fn test_rule_is_stable() {
        let (_rt, scheduler) = scheduler();
        let breaker = new_circuit_breaker_with_metric(
            Rule::error_count("orders", 3.0),
            ScriptedStat::new(),
            scheduler,
        );

        let first = breaker.rule().clone();
        for _ in 0..3 {
            assert!(Arc::ptr_eq(&first, breaker.rule()));
        }
        assert_eq!(*first, Rule::error_count("orders", 3.0));
    }

    #[test]
    fn test_missing_stat_node_fails_open() {
        let (_rt, scheduler) = scheduler();
        let registry = NodeRegistry::new();
        let breaker = new_circuit_breaker(
            Rule::error_count("orders", 0.0),
            Arc::new(registry),
            scheduler.clone(),
        );

        // Threshold 0 would trip on any read; nothing is readable yet
        for _ in 0..3 {
            assert!(breaker.try_pass(&EntryContext::new("orders")));
        }
        assert!(!breaker.state().is_open());
        assert_eq!(scheduler.scheduled(), 0);
    }
}
