//! Parts shared by every strategy.

use std::sync::Arc;

use crate::breaker::metric::MetricSlot;
use crate::breaker::recovery::RecoveryScheduler;
use crate::breaker::rule::Rule;
use crate::breaker::state::BreakerState;

/// Rule, state, metric slot and recovery scheduler of one breaker.
#[derive(Debug)]
pub(crate) struct BreakerCore {
    pub(crate) rule: Arc<Rule>,
    pub(crate) state: Arc<BreakerState>,
    pub(crate) metric: MetricSlot,
    scheduler: Arc<RecoveryScheduler>,
}

impl BreakerCore {
    pub(crate) fn new(rule: Arc<Rule>, metric: MetricSlot, scheduler: Arc<RecoveryScheduler>) -> Self {
        Self {
            rule,
            state: Arc::new(BreakerState::new()),
            metric,
            scheduler,
        }
    }

    /// Decision that needs no metric read: `Some(false)` while open,
    /// `Some(true)` for a disabled rule.
    pub(crate) fn short_circuit(&self) -> Option<bool> {
        if self.state.is_open() {
            return Some(false);
        }
        if !self.rule.enabled {
            return Some(true);
        }
        None
    }

    /// Trip open and, for the winning caller, schedule recovery.
    pub(crate) fn trip(&self) {
        self.scheduler.trip(&self.state, &self.rule);
    }
}
