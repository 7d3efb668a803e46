//! Error ratio strategy.
//!
//! Trips when errors per completed request reach the rule threshold.
//! Windows with fewer than `min_request_amount` passed+blocked requests are
//! never judged. A window with no successful completion and fewer than
//! `min_request_amount` errors is not judged either; that guard runs before
//! the division because `complete` may be zero.

use std::sync::Arc;

use crate::breaker::context::EntryContext;
use crate::breaker::shared::BreakerCore;
use crate::breaker::rule::Rule;
use crate::breaker::state::BreakerState;
use crate::breaker::CircuitBreaker;
use crate::stat::MetricEvent;

#[derive(Debug)]
pub struct ErrorRatioBreaker {
    core: BreakerCore,
    min_request_amount: u64,
}

/// Rates read from one window snapshot.
struct Sample {
    error: f64,
    complete: f64,
    total: f64,
}

impl ErrorRatioBreaker {
    pub(crate) fn new(core: BreakerCore, min_request_amount: u64) -> Self {
        Self {
            core,
            min_request_amount,
        }
    }
}

impl CircuitBreaker for ErrorRatioBreaker {
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
        let Some(sample) = self.core.metric.read(rule, |stat| Sample {
            error: stat.qps(MetricEvent::Error),
            complete: stat.qps(MetricEvent::Complete),
            total: stat.qps(MetricEvent::Pass) + stat.qps(MetricEvent::Block),
        }) else {
            return true;
        };

        let min_request_amount = self.min_request_amount as f64;
        if sample.total < min_request_amount {
            return true;
        }

        // complete = error + successful completions
        let real_complete = sample.complete - sample.error;
        if real_complete <= 0.0 && sample.error < min_request_amount {
            return true;
        }

        if sample.error / sample.complete < rule.threshold {
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

    fn set(stat: &ScriptedStat, pass: f64, block: f64, error: f64, complete: f64) {
        stat.set_qps(MetricEvent::Pass, pass);
        stat.set_qps(MetricEvent::Block, block);
        stat.set_qps(MetricEvent::Error, error);
        stat.set_qps(MetricEvent::Complete, complete);
    }

    fn rule() -> Rule {
        Rule::error_ratio("payments", 0.5, 5).with_recover_timeout(Duration::from_secs(60))
    }

    #[test]
    fn test_below_min_request_amount_admits() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(rule(), stat.clone(), scheduler);

        set(&stat, 2.0, 1.0, 3.0, 3.0);
        assert!(breaker.try_pass(&EntryContext::new("payments")));
        assert!(!breaker.state().is_open());
    }

    #[test]
    fn test_ratio_at_threshold_trips() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(rule(), stat.clone(), scheduler.clone());

        set(&stat, 10.0, 0.0, 6.0, 10.0);
        assert!(!breaker.try_pass(&EntryContext::new("payments")));
        assert!(breaker.state().is_open());
        assert_eq!(scheduler.scheduled(), 1);
    }

    #[test]
    fn test_ratio_below_threshold_admits() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(rule(), stat.clone(), scheduler);

        set(&stat, 10.0, 0.0, 4.0, 10.0);
        assert!(breaker.try_pass(&EntryContext::new("payments")));
    }

    #[test]
    fn test_zero_complete_with_few_errors_admits() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(rule(), stat.clone(), scheduler);

        set(&stat, 10.0, 0.0, 2.0, 0.0);
        assert!(breaker.try_pass(&EntryContext::new("payments")));
        assert!(!breaker.state().is_open());
    }

    #[test]
    fn test_zero_complete_with_many_errors_trips() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(rule(), stat.clone(), scheduler);

        // error / 0 is +inf, never below the threshold
        set(&stat, 10.0, 0.0, 5.0, 0.0);
        assert!(!breaker.try_pass(&EntryContext::new("payments")));
    }

    #[test]
    fn test_open_breaker_reads_nothing() {
        let (_rt, scheduler) = scheduler();
        let stat = ScriptedStat::new();
        let breaker = with_metric(rule(), stat.clone(), scheduler);

        set(&stat, 10.0, 0.0, 6.0, 10.0);
        assert!(!breaker.try_pass(&EntryContext::new("payments")));
        let reads = stat.reads();

        for _ in 0..10 {
            assert!(!breaker.try_pass(&EntryContext::new("payments")));
        }
        assert_eq!(stat.reads(), reads);
    }
}
