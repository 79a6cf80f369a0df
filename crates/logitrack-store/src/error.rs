//! Error types for store access.

use logitrack_core::{EntityKind, LogiTrackError};

/// Errors that can occur when talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is not reachable.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// The row to update or delete does not exist.
    #[error("{kind} {id} does not exist")]
    NotFound { kind: EntityKind, id: String },

    /// A unique constraint rejected the write.
    #[error("unique constraint violated on {kind} {key}")]
    UniqueViolation { kind: EntityKind, key: String },

    /// A foreign key points at a row that does not exist.
    #[error("foreign key violated: {kind} {id} does not exist")]
    ForeignKeyViolation { kind: EntityKind, id: String },
}

impl StoreError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new not-found error.
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates a new unique-violation error.
    pub fn unique_violation(kind: EntityKind, key: impl ToString) -> Self {
        Self::UniqueViolation {
            kind,
            key: key.to_string(),
        }
    }

    /// Creates a new foreign-key-violation error.
    pub fn foreign_key(kind: EntityKind, id: impl ToString) -> Self {
        Self::ForeignKeyViolation {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl From<StoreError> for LogiTrackError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } | StoreError::ForeignKeyViolation { kind, id } => {
                LogiTrackError::NotFound { kind, id }
            },
            StoreError::Unavailable { .. } => LogiTrackError::store_unavailable(err.to_string()),
            StoreError::UniqueViolation { .. } => LogiTrackError::internal(err.to_string()),
        }
    }
}
