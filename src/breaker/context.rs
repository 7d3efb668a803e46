//! Per-request admission context.

use std::time::Instant;

use uuid::Uuid;

/// Context of one admission attempt against a resource.
#[derive(Debug, Clone)]
pub struct EntryContext {
    /// Resource being entered.
    pub resource: String,
    /// Correlation ID for logs.
    pub request_id: Uuid,
    /// When the entry was created.
    pub started_at: Instant,
}

impl EntryContext {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            request_id: Uuid::new_v4(),
            started_at: Instant::now(),
        }
    }
}
