//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds, window shape, strategy parameters)
//! - Validate observability settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BreakerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::breaker::rule::StrategyKind;
use crate::config::schema::{BreakerConfig, RuleConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("rule #{index}: resource name is empty")]
    EmptyResource { index: usize },

    #[error("rule #{index} ({resource}): threshold {value} must be a finite, non-negative number")]
    InvalidThreshold { index: usize, resource: String, value: f64 },

    #[error("rule #{index} ({resource}): error ratio threshold {value} exceeds 1.0")]
    RatioOutOfRange { index: usize, resource: String, value: f64 },

    #[error("rule #{index} ({resource}): sample_count must be greater than 0")]
    ZeroSampleCount { index: usize, resource: String },

    #[error("rule #{index} ({resource}): interval_ms must be greater than 0")]
    ZeroInterval { index: usize, resource: String },

    #[error("rule #{index} ({resource}): interval_ms {interval_ms} is not divisible by sample_count {sample_count}")]
    UnevenWindow { index: usize, resource: String, interval_ms: u32, sample_count: u32 },

    #[error("rule #{index} ({resource}): slow_request_amount must be greater than 0")]
    ZeroSlowRequestAmount { index: usize, resource: String },

    #[error("rule #{index} ({resource}): min_request_amount must be greater than 0")]
    ZeroMinRequestAmount { index: usize, resource: String },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Check the whole configuration, collecting every error.
pub fn validate_config(config: &BreakerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, rule) in config.rules.iter().enumerate() {
        validate_rule(index, rule, &mut errors);
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rule(index: usize, rule: &RuleConfig, errors: &mut Vec<ValidationError>) {
    let resource = rule.resource.clone();
    if rule.resource.trim().is_empty() {
        errors.push(ValidationError::EmptyResource { index });
    }

    if !rule.threshold.is_finite() || rule.threshold < 0.0 {
        errors.push(ValidationError::InvalidThreshold { index, resource: resource.clone(), value: rule.threshold });
    } else if rule.strategy == StrategyKind::ErrorRatio && rule.threshold > 1.0 {
        errors.push(ValidationError::RatioOutOfRange { index, resource: resource.clone(), value: rule.threshold });
    }

    if rule.sample_count == 0 {
        errors.push(ValidationError::ZeroSampleCount { index, resource: resource.clone() });
    }
    if rule.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval { index, resource: resource.clone() });
    }
    if rule.sample_count > 0 && rule.interval_ms > 0 && rule.interval_ms % rule.sample_count != 0 {
        errors.push(ValidationError::UnevenWindow {
            index,
            resource: resource.clone(),
            interval_ms: rule.interval_ms,
            sample_count: rule.sample_count,
        });
    }

    match rule.strategy {
        StrategyKind::AverageLatency if rule.slow_request_amount == 0 => {
            errors.push(ValidationError::ZeroSlowRequestAmount { index, resource });
        }
        StrategyKind::ErrorRatio if rule.min_request_amount == 0 => {
            errors.push(ValidationError::ZeroMinRequestAmount { index, resource });
        }
        _ => {}
    }
}
