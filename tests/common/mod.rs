//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flow_breaker::stat::{MetricEvent, NodeRegistry, ReadStat, ResourceNode};

/// Programmable statistics with a read counter.
#[derive(Default)]
pub struct MockStat {
    avg_rt: AtomicU64,
    qps: [AtomicU64; 4],
    reads: AtomicUsize,
}

impl MockStat {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_avg_rt(&self, value: f64) {
        self.avg_rt.store(value.to_bits(), Ordering::SeqCst);
    }

    pub fn set_qps(&self, event: MetricEvent, value: f64) {
        self.qps[slot(event)].store(value.to_bits(), Ordering::SeqCst);
    }

    /// Total number of `avg_rt`/`qps` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

fn slot(event: MetricEvent) -> usize {
    match event {
        MetricEvent::Pass => 0,
        MetricEvent::Block => 1,
        MetricEvent::Error => 2,
        MetricEvent::Complete => 3,
    }
}

impl ReadStat for MockStat {
    fn avg_rt(&self) -> f64 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        f64::from_bits(self.avg_rt.load(Ordering::SeqCst))
    }

    fn qps(&self, event: MetricEvent) -> f64 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        f64::from_bits(self.qps[slot(event)].load(Ordering::SeqCst))
    }
}

/// Node handing out the same statistics for every window shape, recording
/// the shapes it was asked for.
pub struct MockNode {
    stat: Arc<MockStat>,
    windows: std::sync::Mutex<HashMap<(u32, u32), usize>>,
}

impl MockNode {
    pub fn new(stat: Arc<MockStat>) -> Arc<Self> {
        Arc::new(Self {
            stat,
            windows: std::sync::Mutex::new(HashMap::new()),
        })
    }

    /// How many times a window of this shape was requested.
    pub fn window_requests(&self, sample_count: u32, interval_ms: u32) -> usize {
        let windows = self.windows.lock().unwrap();
        windows.get(&(sample_count, interval_ms)).copied().unwrap_or(0)
    }
}

impl ResourceNode for MockNode {
    fn get_or_create_sliding_window_metric(&self, sample_count: u32, interval_ms: u32) -> Arc<dyn ReadStat> {
        *self.windows.lock().unwrap().entry((sample_count, interval_ms)).or_default() += 1;
        self.stat.clone()
    }
}

/// Registry with one node for `resource`.
pub fn registry_with(resource: &str) -> (Arc<NodeRegistry>, Arc<MockStat>, Arc<MockNode>) {
    let registry = NodeRegistry::new();
    let stat = MockStat::new();
    let node = MockNode::new(stat.clone());
    registry.register(resource, node.clone());
    (Arc::new(registry), stat, node)
}

/// Poll `condition` every 20ms until it holds or `timeout` passes.
pub async fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
