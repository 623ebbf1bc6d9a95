//! Foundation types for the Civic Project Ledger (CPL).
//!
//! This crate provides the identity, hash, and record types used throughout
//! the CPL system. Every other CPL crate depends on `cpl-types`.
//!
//! # Key Types
//!
//! - [`EntityId`] — Non-empty identifier of a tracked entity (a government
//!   project); opaque key into an external entity store
//! - [`EventId`] — UUID v7 event identifier
//! - [`EventHash`] — SHA-256 chain digest, with the all-zero genesis constant
//! - [`LedgerEvent`] — One immutable entry in an entity's hash chain

pub mod error;
pub mod event;
pub mod hash;
pub mod id;

pub use error::TypeError;
pub use event::LedgerEvent;
pub use hash::EventHash;
pub use id::{ActorId, EntityId, EventId, EventType};
