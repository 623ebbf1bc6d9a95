use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// SHA-256 digest linking an event into its entity's chain.
///
/// An `EventHash` is computed over an event's canonical serialization
/// concatenated with its predecessor's hash, so every hash commits to the
/// entire history before it. Hashes serialize as 64-character lowercase hex
/// strings; the genesis constant renders as exactly 64 hex zeros.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventHash([u8; 32]);

impl EventHash {
    /// The genesis hash: a 256-bit zero digest used as the `previous_hash`
    /// of every chain's first event.
    pub const fn genesis() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the genesis hash.
    pub fn is_genesis(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Create an `EventHash` from a pre-computed digest.
    pub const fn from_digest(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string (64 hex characters).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for EventHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHash({})", self.short_hex())
    }
}

impl fmt::Display for EventHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for EventHash {
    fn from(digest: [u8; 32]) -> Self {
        Self(digest)
    }
}

impl From<EventHash> for [u8; 32] {
    fn from(hash: EventHash) -> Self {
        hash.0
    }
}

impl Serialize for EventHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EventHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_64_hex_zeros() {
        let genesis = EventHash::genesis();
        assert!(genesis.is_genesis());
        assert_eq!(genesis.to_hex(), "0".repeat(64));
    }

    #[test]
    fn non_zero_digest_is_not_genesis() {
        let hash = EventHash::from_digest([1; 32]);
        assert!(!hash.is_genesis());
    }

    #[test]
    fn hex_roundtrip() {
        let hash = EventHash::from_digest([0xab; 32]);
        let hex = hash.to_hex();
        let parsed = EventHash::from_hex(&hex).unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = EventHash::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(matches!(
            EventHash::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn short_hex_is_8_chars() {
        let hash = EventHash::from_digest([0xcd; 32]);
        assert_eq!(hash.short_hex().len(), 8);
    }

    #[test]
    fn display_is_full_hex() {
        let hash = EventHash::from_digest([7; 32]);
        let display = format!("{hash}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, hash.to_hex());
    }

    #[test]
    fn serde_is_hex_string() {
        let hash = EventHash::from_digest([0x42; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
        let parsed: EventHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn ordering_is_consistent() {
        let a = EventHash::from_digest([0; 32]);
        let b = EventHash::from_digest([1; 32]);
        assert!(a < b);
    }
}
