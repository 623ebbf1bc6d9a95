use cpl_ledger::LedgerError;
use cpl_store::StoreError;
use cpl_types::TypeError;

/// Errors surfaced by the SDK facade.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// A caller-supplied identifier failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] TypeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Failure opening or recovering a storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;
