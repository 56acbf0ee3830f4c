//! # Error Types
//!
//! Domain-specific error types for cue-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cue-core errors (this file)                                           │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  │   └── kind()       - Conflict | NotFound | Validation               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cue-db errors (separate crate)                                        │
//! │  └── DbError          - Storage failures, wraps CoreError as Domain    │
//! │                                                                         │
//! │  club-api errors (in app)                                              │
//! │  └── ApiError         - What HTTP callers see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every [`CoreError`] is a business-rule rejection, never a transient
//! failure. Callers surface them directly; nothing here is retried.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a business-rule rejection.
///
/// The HTTP layer maps these to status codes (409 / 404 / 400).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request collides with existing state (table already occupied).
    Conflict,
    /// The entity is missing or in the wrong lifecycle state for the operation.
    NotFound,
    /// The request itself is malformed or references an unusable entity.
    Validation,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An active session already exists for the table.
    ///
    /// ## User Workflow
    /// ```text
    /// Open table 2
    ///      │
    ///      ▼
    /// Active session on table 2? ── yes ──► TableOccupied { table_number: 2 }
    ///      │
    ///      no
    ///      ▼
    /// Session created
    /// ```
    #[error("Table {table_number} is already occupied")]
    TableOccupied { table_number: i64 },

    /// Session id does not exist.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session exists but has already been closed.
    #[error("Session {0} is closed")]
    SessionNotActive(String),

    /// Session is still open, so no final bill exists yet.
    #[error("Session {0} is still active")]
    SessionStillActive(String),

    /// Line item does not exist or belongs to another session.
    #[error("Session item {item_id} not found in session {session_id}")]
    SessionItemNotFound { session_id: String, item_id: String },

    /// Inventory item id does not exist.
    #[error("Inventory item not found: {0}")]
    InventoryItemNotFound(String),

    /// Inventory item is missing or deactivated, so it cannot be billed.
    #[error("Inventory item {0} not found or inactive")]
    InventoryItemUnavailable(String),

    /// Admin id or username does not exist.
    #[error("Admin not found: {0}")]
    AdminNotFound(String),

    /// End time does not come after start time.
    #[error("End time {end} must be after start time {start}")]
    InvalidTimeRange { start: String, end: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::TableOccupied { .. } => ErrorKind::Conflict,
            CoreError::SessionNotFound(_)
            | CoreError::SessionNotActive(_)
            | CoreError::SessionItemNotFound { .. }
            | CoreError::InventoryItemNotFound(_)
            | CoreError::AdminNotFound(_) => ErrorKind::NotFound,
            CoreError::SessionStillActive(_)
            | CoreError::InventoryItemUnavailable(_)
            | CoreError::InvalidTimeRange { .. }
            | CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Arithmetic on the value would overflow.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid timestamp, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate item name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
