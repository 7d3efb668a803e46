//! Breaker state machine.
//!
//! # States
//! - Closed: admit and evaluate the strategy
//! - Open: reject without touching metrics
//!
//! # State Transitions
//! ```text
//! Closed → Open: strategy judges the violation sustained (single-winner CAS)
//! Open → Closed: recovery task fires after the rule's cooldown (no re-check)
//! ```
//!
//! There is no half-open state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Mutable state of one breaker: the open/closed flag plus the latency
/// debounce counter.
#[derive(Debug, Default)]
pub struct BreakerState {
    /// false = Closed, true = Open.
    tripped: AtomicBool,
    /// Violating observations since the last compliant one. Only the
    /// average latency strategy advances it.
    violation_count: AtomicU64,
}

impl BreakerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return true while the breaker rejects everything.
    pub fn is_open(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    /// Current debounce counter value.
    pub fn violation_count(&self) -> u64 {
        self.violation_count.load(Ordering::Acquire)
    }

    pub(crate) fn reset_violations(&self) {
        self.violation_count.store(0, Ordering::Release);
    }

    /// Count one violating observation, returning the post-increment value.
    pub(crate) fn record_violation(&self) -> u64 {
        self.violation_count.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Closed → Open. Exactly one concurrent caller gets `true`.
    pub(crate) fn try_trip(&self) -> bool {
        self.tripped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Open → Closed, clearing the debounce counter first.
    pub(crate) fn recover(&self) {
        self.violation_count.store(0, Ordering::Release);
        self.tripped.store(false, Ordering::Release);
    }
}
