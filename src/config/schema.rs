//! Configuration schema definitions.
//!
//! This module defines the rule file structure. All types derive Serde
//! traits for deserialization from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::breaker::rule::{Rule, Strategy, StrategyKind, DEFAULT_INTERVAL_MS, DEFAULT_SAMPLE_COUNT};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BreakerConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Circuit breaking rules.
    pub rules: Vec<RuleConfig>,
}

impl BreakerConfig {
    /// Convert every rule entry into a breaker `Rule`.
    pub fn to_rules(&self) -> Vec<Rule> {
        self.rules.iter().map(Rule::from).collect()
    }
}

/// One circuit breaking rule as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Guarded resource name.
    pub resource: String,

    /// Tripping strategy.
    pub strategy: StrategyKind,

    /// Latency ceiling (ms), error ratio ceiling, or error count ceiling.
    pub threshold: f64,

    /// Seconds the breaker stays open after tripping.
    pub recover_timeout_secs: u64,

    /// Sliding window sample count.
    #[serde(default = "default_sample_count")]
    pub sample_count: u32,

    /// Sliding window interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u32,

    /// Violating observations tolerated before an average latency breaker trips.
    #[serde(default = "default_slow_request_amount")]
    pub slow_request_amount: u64,

    /// Minimum requests in the window before an error ratio breaker judges.
    #[serde(default = "default_min_request_amount")]
    pub min_request_amount: u64,

    /// Disabled rules admit everything.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_sample_count() -> u32 {
    DEFAULT_SAMPLE_COUNT
}

fn default_interval_ms() -> u32 {
    DEFAULT_INTERVAL_MS
}

fn default_slow_request_amount() -> u64 {
    5
}

fn default_min_request_amount() -> u64 {
    5
}

fn default_enabled() -> bool {
    true
}

impl From<&RuleConfig> for Rule {
    fn from(config: &RuleConfig) -> Self {
        let strategy = match config.strategy {
            StrategyKind::AverageLatency => Strategy::AverageLatency {
                slow_request_amount: config.slow_request_amount,
            },
            StrategyKind::ErrorRatio => Strategy::ErrorRatio {
                min_request_amount: config.min_request_amount,
            },
            StrategyKind::ErrorCount => Strategy::ErrorCount,
        };
        Rule {
            resource: config.resource.clone(),
            strategy,
            threshold: config.threshold,
            recover_timeout: Duration::from_secs(config.recover_timeout_secs),
            sample_count: config.sample_count,
            interval_ms: config.interval_ms,
            enabled: config.enabled,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
