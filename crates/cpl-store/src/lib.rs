//! Ordered event storage for the Civic Project Ledger.
//!
//! This crate implements the durable append-only log the ledger engine
//! writes to: one ordered sequence of events per tracked entity, behind the
//! [`EventLog`] trait.
//!
//! # Storage Backends
//!
//! - [`InMemoryEventLog`] -- per-entity chains for tests and embedding
//! - [`FileEventLog`] -- crash-recoverable CRC-framed segment file
//!
//! # Design Rules
//!
//! 1. Events are immutable once appended; there is no update or delete.
//! 2. Appends are conditional: an append succeeds only if it extends the
//!    current tip (sequence and previous-hash check). A failed condition is
//!    a conflict, not corruption -- the caller re-reads the tip and retries.
//! 3. Appends are serialized per entity but parallel across entities.
//! 4. Readers see only fully persisted events and always receive copies.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::{FileEventLog, SyncMode};
pub use memory::InMemoryEventLog;
pub use traits::EventLog;
