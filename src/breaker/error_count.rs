//! Error count strategy: trips as soon as the error rate reaches the
//! threshold. No minimum sample size applies.

use std::sync::Arc;

use crate::breaker::context::EntryContext;
use crate::breaker::shared::BreakerCore;
use crate::breaker::rule::Rule;
use crate::breaker::state::BreakerState;
use crate::breaker::CircuitBreaker;
use crate::stat::MetricEvent;

#[derive(Debug)]
pub struct ErrorCountBreaker {
    core: BreakerCore,
}

impl ErrorCountBreaker {
    pub(crate) fn new(core: BreakerCore) -> Self {
        Self { core }
    }
}

impl CircuitBreaker for ErrorCountBreaker {
    fn rule(&self) -> &Arc<Rule> {
        &self.core.rule
    }

    fn state(&self) -> &BreakerState {
        &self.core.state
    }

    fn try_pass(&self, _ctx: &EntryContext) -> bool {
        if let Some(decision) = self.core.short_circuit() {
            return decision;
        }
        let rule = &self.core.rule;
        let Some(errors) = self.core.metric.read(rule, |stat| stat.qps(MetricEvent::Error)) else {
            return true;
        };
        if errors < rule.threshold {
            return true;
        }

        self.core.trip();
        false
    }
}
