//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl-C received → trigger() → rule watcher loop exits → process exits
//! ```
//!
//! # Design Decisions
//! - Pending recovery timers are not awaited on exit; breaker state is in-memory only

pub mod shutdown;

pub use shutdown::Shutdown;
