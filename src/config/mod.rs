//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! rule file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BreakerConfig (validated, immutable)
//!     → RuleManager::load_rules
//!
//! On file change:
//!     watcher.rs detects change
//!     → blank file (truncated mid-write)? skip, keep current rules
//!     → loader.rs parses new config
//!     → validation.rs validates (invalid reloads are logged and dropped)
//!     → apply_updates swaps the breaker table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All optional fields have defaults to allow minimal rule files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BreakerConfig, ObservabilityConfig, RuleConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::{apply_updates, reload_config, ConfigWatcher};
