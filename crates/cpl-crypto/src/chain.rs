use cpl_types::{EventHash, LedgerEvent};

use crate::canonical::CryptoError;
use crate::hasher::EventHasher;

/// First failure found while walking a chain oldest-first.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("broken link at index {index}: previous hash does not match")]
    BrokenLink { index: usize },

    #[error("hash mismatch at index {index}: stored hash differs from recomputation")]
    HashMismatch { index: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<CryptoError> for ChainError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Serialization(s) => Self::Serialization(s),
        }
    }
}

/// Hash chain integrity verifier.
///
/// Walks one entity's events oldest-first, carrying the expected predecessor
/// hash from genesis. For each event the link is checked before the digest
/// is recomputed, so both a severed link and an in-place edit report the
/// first index the scan reaches.
pub struct ChainVerifier;

impl ChainVerifier {
    /// Verify an oldest-first slice of one entity's events.
    ///
    /// An empty slice is a valid (empty) chain. The first event must link to
    /// the genesis constant.
    pub fn verify_chain(events: &[LedgerEvent]) -> Result<(), ChainError> {
        let mut expected_previous = EventHash::genesis();

        for (index, event) in events.iter().enumerate() {
            if event.previous_hash != expected_previous {
                return Err(ChainError::BrokenLink { index });
            }
            if !EventHasher::verify(event, &expected_previous)? {
                return Err(ChainError::HashMismatch { index });
            }
            expected_previous = event.current_hash;
        }

        Ok(())
    }
}
