//! Lazy resolution of a breaker's metric source.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::breaker::rule::Rule;
use crate::stat::{ReadStat, ResourceRegistry};

/// Soft reference from a breaker to the window metric of its resource.
///
/// Resolution is retried on every read until it succeeds. Concurrent
/// callers may resolve redundantly; the lookup is idempotent and the last
/// store wins. An unresolved slot yields `None` and the caller fails open.
pub struct MetricSlot {
    metric: ArcSwapOption<Arc<dyn ReadStat>>,
    registry: Option<Arc<dyn ResourceRegistry>>,
}

impl MetricSlot {
    /// Slot bound to an already-known metric.
    pub fn resolved(metric: Arc<dyn ReadStat>) -> Self {
        Self {
            metric: ArcSwapOption::from_pointee(metric),
            registry: None,
        }
    }

    /// Slot resolved through `registry`, attempted once right away.
    pub fn lazy(registry: Arc<dyn ResourceRegistry>, rule: &Rule) -> Self {
        let metric = registry
            .get_resource_node(&rule.resource)
            .map(|node| node.get_or_create_sliding_window_metric(rule.sample_count, rule.interval_ms));
        if metric.is_none() {
            tracing::debug!(resource = %rule.resource, "Resource has no stat node yet; metric resolution deferred");
        }
        Self {
            metric: ArcSwapOption::new(metric.map(Arc::new)),
            registry: Some(registry),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.metric.load().is_some()
    }

    /// Run `f` against the metric, resolving it first if needed.
    pub fn read<R>(&self, rule: &Rule, f: impl FnOnce(&dyn ReadStat) -> R) -> Option<R> {
        {
            let guard = self.metric.load();
            if let Some(stat) = &*guard {
                return Some(f(&***stat));
            }
        }
        let stat = self.resolve(rule)?;
        Some(f(stat.as_ref()))
    }

    fn resolve(&self, rule: &Rule) -> Option<Arc<dyn ReadStat>> {
        let registry = self.registry.as_ref()?;
        let Some(node) = registry.get_resource_node(&rule.resource) else {
            tracing::error!(resource = %rule.resource, "Resource stat node is missing; admitting request");
            return None;
        };
        let stat = node.get_or_create_sliding_window_metric(rule.sample_count, rule.interval_ms);
        self.metric.store(Some(Arc::new(stat.clone())));
        tracing::warn!(
            resource = %rule.resource,
            strategy = %rule.kind(),
            "Delayed initialization of circuit breaker metric"
        );
        Some(stat)
    }
}

impl fmt::Debug for MetricSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricSlot")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
