//! Average latency strategy.
//!
//! Trips when the window's average response time stays at or above the
//! rule threshold for `slow_request_amount` observations. Any compliant
//! observation resets the debounce counter; violating observations from
//! any caller advance it.

use std::sync::Arc;

use crate::breaker::context::EntryContext;
use crate::breaker::shared::BreakerCore;
use crate::breaker::rule::Rule;
use crate::breaker::state::BreakerState;
use crate::breaker::CircuitBreaker;

#[derive(Debug)]
pub struct AverageLatencyBreaker {
    core: BreakerCore,
    slow_request_amount: u64,
}

impl AverageLatencyBreaker {
    pub(crate) fn new(core: BreakerCore, slow_request_amount: u64) -> Self {
        Self {
            core,
            slow_request_amount,
        }
    }
}

impl CircuitBreaker for AverageLatencyBreaker {
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
        let Some(avg_rt) = self.core.metric.read(rule, |stat| stat.avg_rt()) else {
            return true;
        };

        if avg_rt < rule.threshold {
            self.core.state.reset_violations();
            return true;
        }
        if self.core.state.record_violation() < self.slow_request_amount {
            return true;
        }

        self.core.trip();
        false
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::breaker::testing::{scheduler, ScriptedStat};
    use crate::breaker::new_circuit_breaker_with_metric as with_metric;

    #[test]
    fn test_tolerates_until_slow_request_amount() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let rule = Rule::average_latency("orders", 100.0, 3).with_recover_timeout(Duration::from_secs(60));
        let breaker = with_metric(rule, stat.clone(), scheduler.clone());
        let ctx = EntryContext::new("orders");

        stat.set_avg_rt(150.0);
        assert!(breaker.try_pass(&ctx));
        assert!(breaker.try_pass(&ctx));
        assert_eq!(breaker.state().violation_count(), 2);

        assert!(!breaker.try_pass(&ctx));
        assert!(breaker.state().is_open());
        assert_eq!(scheduler.scheduled(), 1);

        // Open wins even once latency drops
        stat.set_avg_rt(10.0);
        assert!(!breaker.try_pass(&ctx));
    }

    #[test]
    fn test_compliant_sample_resets_counter() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(Rule::average_latency("orders", 100.0, 3), stat.clone(), scheduler);
        let ctx = EntryContext::new("orders");

        stat.set_avg_rt(150.0);
        assert!(breaker.try_pass(&ctx));
        assert!(breaker.try_pass(&ctx));

        stat.set_avg_rt(50.0);
        assert!(breaker.try_pass(&ctx));
        assert_eq!(breaker.state().violation_count(), 0);

        stat.set_avg_rt(150.0);
        assert!(breaker.try_pass(&ctx));
        assert!(breaker.try_pass(&ctx));
        assert!(!breaker.state().is_open());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(Rule::average_latency("orders", 100.0, 1), stat.clone(), scheduler);

        stat.set_avg_rt(100.0);
        assert!(!breaker.try_pass(&EntryContext::new("orders")));
    }

    #[test]
    fn test_disabled_rule_admits_without_reads() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        stat.set_avg_rt(1_000.0);
        let breaker = with_metric(Rule::average_latency("orders", 100.0, 1).disabled(), stat.clone(), scheduler);

        for _ in 0..5 {
            assert!(breaker.try_pass(&EntryContext::new("orders")));
        }
        assert_eq!(stat.reads(), 0);
    }
}
