//! Test doubles for strategy unit tests.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::breaker::recovery::RecoveryScheduler;
use crate::stat::{MetricEvent, ReadStat};

/// A metric whose values are set by the test, counting every read.
#[derive(Debug, Default)]
pub(crate) struct ScriptedStat {
    avg_rt: AtomicU64,
    pass: AtomicU64,
    block: AtomicU64,
    error: AtomicU64,
    complete: AtomicU64,
    reads: AtomicUsize,
}

impl ScriptedStat {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn set_avg_rt(&self, value: f64) {
        self.avg_rt.store(value.to_bits(), Ordering::SeqCst);
    }

    pub(crate) fn set_qps(&self, event: MetricEvent, value: f64) {
        self.slot(event).store(value.to_bits(), Ordering::SeqCst);
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn slot(&self, event: MetricEvent) -> &AtomicU64 {
        match event {
            MetricEvent::Pass => &self.pass,
            MetricEvent::Block => &self.block,
            MetricEvent::Error => &self.error,
            MetricEvent::Complete => &self.complete,
        }
    }
}

impl ReadStat for ScriptedStat {
    fn avg_rt(&self) -> f64 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        f64::from_bits(self.avg_rt.load(Ordering::SeqCst))
    }

    fn qps(&self, event: MetricEvent) -> f64 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        f64::from_bits(self.slot(event).load(Ordering::SeqCst))
    }
}

/// A runtime plus a scheduler spawning onto it.
pub(crate) fn scheduler() -> (Runtime, Arc<RecoveryScheduler>) {
    let runtime = Runtime::new().expect("failed to build test runtime");
    let scheduler = Arc::new(RecoveryScheduler::new(runtime.handle().clone()));
    (runtime, scheduler)
}
