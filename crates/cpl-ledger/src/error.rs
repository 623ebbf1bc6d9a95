use cpl_crypto::CryptoError;
use cpl_store::StoreError;
use cpl_types::EntityId;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Bounded conditional-append retries exhausted under sustained
    /// same-entity contention.
    #[error("append contention on {entity}: {attempts} attempts exhausted")]
    AppendContention { entity: EntityId, attempts: u32 },

    /// The event payload could not be canonically serialized; nothing was
    /// persisted.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Failure from the underlying event log.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CryptoError> for LedgerError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Serialization(s) => Self::Serialization(s),
        }
    }
}
