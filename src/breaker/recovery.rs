//! Trip-and-recover protocol.
//!
//! # Responsibilities
//! - Perform the Closed → Open transition for every strategy
//! - Schedule one detached recovery task per trip episode
//! - Isolate panics inside recovery tasks from request threads

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::runtime::Handle;

use crate::breaker::rule::Rule;
use crate::breaker::state::BreakerState;
use crate::observability::metrics;

/// Spawns recovery timers on a Tokio runtime.
///
/// Tasks are fire-and-forget: no handle is kept and nothing cancels them.
#[derive(Debug)]
pub struct RecoveryScheduler {
    handle: Handle,
    /// Recovery tasks spawned so far.
    scheduled: AtomicU64,
    /// Recovery tasks that panicked before closing their breaker.
    failed: Arc<AtomicU64>,
}

impl RecoveryScheduler {
    /// Create a scheduler spawning onto the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            scheduled: AtomicU64::new(0),
            failed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a scheduler on the runtime of the calling thread, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Number of recovery tasks spawned.
    pub fn scheduled(&self) -> u64 {
        self.scheduled.load(Ordering::Acquire)
    }

    /// Number of recovery tasks that failed.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Acquire)
    }

    /// Trip `state` open on behalf of `rule`.
    ///
    /// Only the caller winning the compare-and-swap schedules recovery and
    /// gets `true`; everyone else observes the breaker already open.
    pub fn trip(&self, state: &Arc<BreakerState>, rule: &Rule) -> bool {
        let shared = state.clone();
        let cooldown = rule.recover_timeout;
        self.trip_with(state, rule, async move {
            tokio::time::sleep(cooldown).await;
            shared.recover();
        })
    }

    /// Trip `state` and run `recovery` in the isolated task if this caller won.
    pub(crate) fn trip_with<F>(&self, state: &BreakerState, rule: &Rule, recovery: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !state.try_trip() {
            return false;
        }

        tracing::warn!(
            resource = %rule.resource,
            strategy = %rule.kind(),
            threshold = rule.threshold,
            recover_secs = rule.recover_timeout.as_secs_f64(),
            "Circuit breaker tripped"
        );
        metrics::record_trip(&rule.resource, rule.kind());

        self.spawn_isolated(rule.resource.clone(), recovery);
        true
    }

    /// Spawn `task` inside a catch-and-log boundary.
    fn spawn_isolated<F>(&self, resource: String, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.scheduled.fetch_add(1, Ordering::AcqRel);
        let failed = self.failed.clone();

        self.handle.spawn(async move {
            match AssertUnwindSafe(task).catch_unwind().await {
                Ok(()) => {
                    tracing::info!(resource = %resource, "Circuit breaker recovered");
                    metrics::record_recovery(&resource);
                }
                Err(panic) => {
                    failed.fetch_add(1, Ordering::AcqRel);
                    tracing::error!(
                        resource = %resource,
                        reason = %panic_message(panic.as_ref()),
                        "Circuit breaker recovery task panicked; breaker stays open"
                    );
                    metrics::record_recovery_failure(&resource);
                }
            }
        });
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
