//! Chain hashing for the Civic Project Ledger (CPL).
//!
//! This crate owns the cryptographic half of the ledger:
//! - Canonical event serialization with a stable field and key order, so the
//!   same logical event always hashes to the same digest on every platform
//! - SHA-256 linkage of each event to its predecessor
//! - Pure chain verification over an oldest-first slice of one entity's
//!   events

pub mod canonical;
pub mod chain;
pub mod hasher;

pub use canonical::{canonical_event_bytes, canonical_payload, CryptoError};
pub use chain::{ChainError, ChainVerifier};
pub use hasher::EventHasher;
