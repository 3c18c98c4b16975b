//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers:
//! circulation bookkeeping, directory lookup, label generation and
//! notification read-state.

pub mod circulation;
pub mod labels;
pub mod lookup;
pub mod notifications;

use serde::Serialize;
use std::fmt;

/// Error type for service operations
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    NotFound(String),
    /// Bad input; rejected before any side effect
    Validation(String),
    /// Precondition on current record state failed
    InvalidState(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(msg) => write!(f, "Database error: {}", msg),
            ServiceError::NotFound(msg) => write!(f, "{}", msg),
            ServiceError::Validation(msg) => write!(f, "{}", msg),
            ServiceError::InvalidState(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}

/// Aggregate outcome of a best-effort bulk operation. Failed items are
/// counted and logged, never rolled back against the successes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

/// Timestamp format shared by all tables.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FMT).to_string()
}
