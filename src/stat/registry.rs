//! In-process resource registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::stat::{ResourceNode, ResourceRegistry};

/// A concurrent map of resource name -> statistic node.
///
/// The embedding runtime registers a node once a resource sees its first
/// request; breakers resolve against it lazily.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    inner: Arc<DashMap<String, Arc<dyn ResourceNode>>>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the node for a resource.
    pub fn register(&self, resource: impl Into<String>, node: Arc<dyn ResourceNode>) {
        let resource = resource.into();
        tracing::debug!(resource = %resource, "Registering resource node");
        self.inner.insert(resource, node);
    }

    /// Remove the node for a resource, returning it if present.
    pub fn remove(&self, resource: &str) -> Option<Arc<dyn ResourceNode>> {
        self.inner.remove(resource).map(|(_, node)| node)
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Names of all registered resources, sorted.
    pub fn resources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }
}

impl ResourceRegistry for NodeRegistry {
    fn get_resource_node(&self, resource: &str) -> Option<Arc<dyn ResourceNode>> {
        self.inner.get(resource).map(|r| r.value().clone())
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("resources", &self.resources())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat::{MetricEvent, ReadStat};

    struct ConstStat;

    impl ReadStat for ConstStat {
        fn avg_rt(&self) -> f64 {
            42.0
        }
        fn qps(&self, _event: MetricEvent) -> f64 {
            1.0
        }
    }

    struct ConstNode;

    impl ResourceNode for ConstNode {
        fn get_or_create_sliding_window_metric(&self, _: u32, _: u32) -> Arc<dyn ReadStat> {
            Arc::new(ConstStat)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = NodeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_resource_node("orders").is_none());

        registry.register("orders", Arc::new(ConstNode));
        registry.register("payments", Arc::new(ConstNode));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resources(), vec!["orders".to_string(), "payments".to_string()]);

        let node = registry.get_resource_node("orders").unwrap();
        let stat = node.get_or_create_sliding_window_metric(2, 1000);
        assert_eq!(stat.avg_rt(), 42.0);
    }

    #[test]
    fn test_remove() {
        let registry = NodeRegistry::new();
        registry.register("orders", Arc::new(ConstNode));

        // Clones share the same map
        let view = registry.clone();
        assert!(view.remove("orders").is_some());
        assert!(registry.get_resource_node("orders").is_none());
        assert!(registry.remove("orders").is_none());
    }
}
