//! Circuit breaking decision engine.
//!
//! Guards named resources by reading their sliding-window statistics and
//! rejecting calls while a breaker is open. Three strategies are provided:
//! average latency, error ratio and error count.

pub mod breaker;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod stat;

pub use breaker::{
    new_circuit_breaker, new_circuit_breaker_with_metric, CircuitBreaker, CircuitBreakerSlot, EntryContext,
    RecoveryScheduler, Rule, RuleManager, Strategy, StrategyKind, TokenResult,
};
pub use config::BreakerConfig;
pub use lifecycle::Shutdown;
pub use stat::{MetricEvent, NodeRegistry, ReadStat, ResourceNode, ResourceRegistry};
