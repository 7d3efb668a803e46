//! Circuit breaking rules.
//!
//! A `Rule` is immutable once bound to a breaker. Reloading configuration
//! produces new `Rule` values and new breaker instances.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default sliding window sample count.
pub const DEFAULT_SAMPLE_COUNT: u32 = 2;
/// Default sliding window interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// Tripping strategy tag, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    AverageLatency,
    ErrorRatio,
    ErrorCount,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::AverageLatency => "average_latency",
            StrategyKind::ErrorRatio => "error_ratio",
            StrategyKind::ErrorCount => "error_count",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tripping strategy with its strategy-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Trip when average latency stays at or above `threshold` (ms) for
    /// `slow_request_amount` observations.
    AverageLatency { slow_request_amount: u64 },
    /// Trip when error/complete reaches `threshold`, once at least
    /// `min_request_amount` requests were seen.
    ErrorRatio { min_request_amount: u64 },
    /// Trip when the error rate reaches `threshold`.
    ErrorCount,
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::AverageLatency { .. } => StrategyKind::AverageLatency,
            Strategy::ErrorRatio { .. } => StrategyKind::ErrorRatio,
            Strategy::ErrorCount => StrategyKind::ErrorCount,
        }
    }
}

/// Immutable configuration of one circuit breaker.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Guarded resource name.
    pub resource: String,
    /// Tripping strategy.
    pub strategy: Strategy,
    /// Strategy-specific ceiling: latency (ms), error ratio, or error count.
    pub threshold: f64,
    /// Cooldown before the breaker closes again.
    pub recover_timeout: Duration,
    /// Sliding window sample count, passed through to the metric source.
    pub sample_count: u32,
    /// Sliding window interval in milliseconds, passed through to the metric source.
    pub interval_ms: u32,
    /// Disabled rules admit everything.
    pub enabled: bool,
}

impl Rule {
    fn new(resource: impl Into<String>, strategy: Strategy, threshold: f64) -> Self {
        Self {
            resource: resource.into(),
            strategy,
            threshold,
            recover_timeout: Duration::from_secs(1),
            sample_count: DEFAULT_SAMPLE_COUNT,
            interval_ms: DEFAULT_INTERVAL_MS,
            enabled: true,
        }
    }

    /// Average latency rule: `max_rt_ms` ceiling, tolerating
    /// `slow_request_amount - 1` violating observations.
    pub fn average_latency(resource: impl Into<String>, max_rt_ms: f64, slow_request_amount: u64) -> Self {
        Self::new(resource, Strategy::AverageLatency { slow_request_amount }, max_rt_ms)
    }

    /// Error ratio rule.
    pub fn error_ratio(resource: impl Into<String>, max_ratio: f64, min_request_amount: u64) -> Self {
        Self::new(resource, Strategy::ErrorRatio { min_request_amount }, max_ratio)
    }

    /// Absolute error count rule.
    pub fn error_count(resource: impl Into<String>, max_errors: f64) -> Self {
        Self::new(resource, Strategy::ErrorCount, max_errors)
    }

    pub fn with_recover_timeout(mut self, recover_timeout: Duration) -> Self {
        self.recover_timeout = recover_timeout;
        self
    }

    pub fn with_window(mut self, sample_count: u32, interval_ms: u32) -> Self {
        self.sample_count = sample_count;
        self.interval_ms = interval_ms;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] threshold={} recover={}s window={}x{}ms",
            self.resource,
            self.kind(),
            self.threshold,
            self.recover_timeout.as_secs(),
            self.sample_count,
            self.interval_ms
        )?;
        match self.strategy {
            Strategy::AverageLatency { slow_request_amount } => {
                write!(f, " slow_request_amount={}", slow_request_amount)?
            }
            Strategy::ErrorRatio { min_request_amount } => {
                write!(f, " min_request_amount={}", min_request_amount)?
            }
            Strategy::ErrorCount => {}
        }
        if !self.enabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}
