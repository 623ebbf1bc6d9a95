use cpl_types::EntityId;

/// Errors from event log operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Conditional append lost a race: the chain advanced past the sequence
    /// number the caller computed against.
    #[error("sequence conflict for {entity}: attempted seq {attempted}, log expects {expected}")]
    SeqConflict {
        entity: EntityId,
        attempted: u64,
        expected: u64,
    },

    /// Conditional append carried a stale predecessor hash.
    #[error("previous-hash mismatch for {entity} at seq {seq}")]
    PrevHashMismatch { entity: EntityId, seq: u64 },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend state is unreachable (e.g. a poisoned lock).
    #[error("event log unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns `true` for conditional-append conflicts that are safe to
    /// retry after re-reading the tip.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SeqConflict { .. } | Self::PrevHashMismatch { .. }
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
