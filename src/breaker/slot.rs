//! Admission slot: runs every breaker of a resource for one entry.

use std::sync::Arc;

use crate::breaker::context::EntryContext;
use crate::breaker::manager::RuleManager;
use crate::breaker::rule::Rule;
use crate::observability::metrics;

/// Why an entry was rejected.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub resource: String,
    /// Rule of the breaker that rejected the entry.
    pub rule: Arc<Rule>,
}

/// Outcome of an admission check.
#[derive(Debug, Clone)]
pub enum TokenResult {
    Pass,
    Blocked(BlockInfo),
}

impl TokenResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TokenResult::Pass)
    }

    pub fn is_blocked(&self) -> bool {
        !self.is_pass()
    }
}

/// Checks entries against the breakers of a `RuleManager`.
#[derive(Debug, Clone)]
pub struct CircuitBreakerSlot {
    manager: Arc<RuleManager>,
}

impl CircuitBreakerSlot {
    pub fn new(manager: Arc<RuleManager>) -> Self {
        Self { manager }
    }

    /// Evaluate the entry's resource breakers in rule order; the first
    /// rejection wins. Resources without rules always pass.
    pub fn check(&self, ctx: &EntryContext) -> TokenResult {
        let table = self.manager.snapshot();
        let Some(breakers) = table.get(&ctx.resource) else {
            return TokenResult::Pass;
        };

        for breaker in breakers {
            if breaker.try_pass(ctx) {
                continue;
            }
            let rule = breaker.rule().clone();
            tracing::debug!(
                request_id = %ctx.request_id,
                resource = %ctx.resource,
                strategy = %rule.kind(),
                "Entry blocked by circuit breaker"
            );
            metrics::record_blocked(&ctx.resource, rule.kind());
            return TokenResult::Blocked(BlockInfo {
                resource: ctx.resource.clone(),
                rule,
            });
        }
        TokenResult::Pass
    }
}
