//! Active rule set management.
//!
//! # Responsibilities
//! - Turn a rule list into breakers, grouped by resource
//! - Swap the whole table atomically on reload
//! - Keep breakers of unchanged rules across reloads

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::breaker::recovery::RecoveryScheduler;
use crate::breaker::rule::Rule;
use crate::breaker::{new_circuit_breaker, CircuitBreaker};
use crate::observability::metrics;
use crate::stat::ResourceRegistry;

/// Resource name -> breakers, in rule order.
pub type BreakerTable = HashMap<String, Vec<Arc<dyn CircuitBreaker>>>;

/// Owns the active breaker table.
pub struct RuleManager {
    table: ArcSwap<BreakerTable>,
    registry: Arc<dyn ResourceRegistry>,
    scheduler: Arc<RecoveryScheduler>,
}

impl RuleManager {
    /// Create a manager with no rules.
    pub fn new(registry: Arc<dyn ResourceRegistry>, scheduler: Arc<RecoveryScheduler>) -> Self {
        Self {
            table: ArcSwap::from_pointee(HashMap::new()),
            registry,
            scheduler,
        }
    }

    /// Replace the active rule set, returning the number of active breakers.
    ///
    /// A rule equal to a currently active one keeps its breaker (and that
    /// breaker's open/closed state). Every other rule gets a fresh breaker.
    /// Breakers not carried over are dropped; a recovery task they left
    /// behind only touches their own state.
    pub fn load_rules(&self, rules: Vec<Rule>) -> usize {
        let current = self.table.load_full();
        let mut reusable: Vec<Arc<dyn CircuitBreaker>> = current.values().flatten().cloned().collect();

        let mut next: BreakerTable = HashMap::new();
        let mut reused = 0usize;
        for rule in rules {
            let breaker = match reusable.iter().position(|b| **b.rule() == rule) {
                Some(index) => {
                    reused += 1;
                    reusable.swap_remove(index)
                }
                None => new_circuit_breaker(rule, self.registry.clone(), self.scheduler.clone()),
            };
            next.entry(breaker.rule().resource.clone()).or_default().push(breaker);
        }

        let active: usize = next.values().map(Vec::len).sum();
        self.table.store(Arc::new(next));

        tracing::info!(
            active,
            reused,
            discarded = reusable.len(),
            "Circuit breaker rules loaded"
        );
        metrics::record_active_rules(active);
        active
    }

    /// Drop every rule.
    pub fn clear(&self) {
        self.load_rules(Vec::new());
    }

    /// Current table. Cheap; later reloads do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<BreakerTable> {
        self.table.load_full()
    }

    /// Breakers guarding `resource`, in rule order.
    pub fn breakers_for(&self, resource: &str) -> Vec<Arc<dyn CircuitBreaker>> {
        self.table.load().get(resource).cloned().unwrap_or_default()
    }

    /// All active rules, ordered by resource then rule order.
    pub fn rules(&self) -> Vec<Arc<Rule>> {
        let table = self.table.load();
        let mut resources: Vec<&String> = table.keys().collect();
        resources.sort();
        resources
            .into_iter()
            .flat_map(|resource| table[resource].iter().map(|b| b.rule().clone()))
            .collect()
    }

    /// Number of resources with at least one breaker.
    pub fn resource_count(&self) -> usize {
        self.table.load().len()
    }

    pub fn scheduler(&self) -> &Arc<RecoveryScheduler> {
        &self.scheduler
    }
}

impl fmt::Debug for RuleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleManager")
            .field("resources", &self.resource_count())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
