//! Error types for LogiTrack.
//!
//! [`LogiTrackError`] is the taxonomy surfaced to callers of the inventory
//! and order operations. Cache failures never appear here: the cache layer
//! absorbs them and falls back to the store.
//!
//! # Example
//!
//! ```
//! use logitrack_core::{EntityKind, LogiTrackError, Result};
//!
//! fn find(id: i64) -> Result<()> {
//!     Err(LogiTrackError::not_found(EntityKind::InventoryItem, id))
//! }
//!
//! let err = find(9).unwrap_err();
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "inventory_item 9 not found");
//! ```

use thiserror::Error;

use crate::types::EntityKind;

/// Main error type for LogiTrack operations.
#[derive(Debug, Error)]
pub enum LogiTrackError {
    /// A referenced entity does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the missing entity
        kind: EntityKind,
        /// Identifier that was requested
        id: String,
    },

    /// An entity failed its attribute invariants. Nothing was written.
    #[error("Validation failed for field '{field}': {message}")]
    ValidationFailed {
        /// Field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// The store could not be reached or failed mid-operation.
    #[error("Store unavailable: {reason}")]
    StoreUnavailable {
        /// What went wrong
        reason: String,
    },

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LogiTrackError {
    /// Creates a NotFound error.
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates a ValidationFailed error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a StoreUnavailable error.
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error indicates a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Returns true if the caller may retry the operation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

/// Result alias for LogiTrack operations.
pub type Result<T> = std::result::Result<T, LogiTrackError>;
