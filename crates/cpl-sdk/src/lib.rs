//! High-level API for the Civic Project Ledger (CPL).
//!
//! [`CivicLedger`] wraps the ledger engine and a storage backend behind the
//! operations the external entity service and presentation layers need:
//! record a business action, read a timeline (public or audit view), check
//! chain integrity, and fold an entity's current status.

pub mod error;
pub mod ledger;
pub mod view;

pub use error::{SdkError, SdkResult};
pub use ledger::CivicLedger;
pub use view::EventView;
