use sha2::{Digest, Sha256};

use cpl_types::{EventHash, LedgerEvent};

use crate::canonical::{canonical_payload, CryptoError};

/// SHA-256 chain hasher.
///
/// `current_hash = SHA-256(canonical_payload ++ hex(previous_hash))`. The
/// digest covers every event field plus the predecessor link, so tampering
/// with any field — or with the link itself — changes the recomputed value.
pub struct EventHasher;

impl EventHasher {
    /// Digest a canonical payload against its predecessor hash.
    pub fn link(payload: &[u8], previous: &EventHash) -> EventHash {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        hasher.update(previous.to_hex().as_bytes());
        EventHash::from_digest(hasher.finalize().into())
    }

    /// Recompute an event's digest from its stored fields and the given
    /// predecessor hash.
    pub fn recompute(event: &LedgerEvent, previous: &EventHash) -> Result<EventHash, CryptoError> {
        Ok(Self::link(&canonical_payload(event)?, previous))
    }

    /// Returns `true` if the stored `current_hash` matches a recomputation
    /// from the event's own fields and the given predecessor hash.
    pub fn verify(event: &LedgerEvent, previous: &EventHash) -> Result<bool, CryptoError> {
        Ok(Self::recompute(event, previous)? == event.current_hash)
    }
}
