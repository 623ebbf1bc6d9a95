use serde::{Deserialize, Serialize};
use serde_json::Value;

use cpl_types::{ActorId, EntityId, EventType, LedgerEvent};

use crate::error::LedgerError;
use crate::validation::IntegrityReport;

/// Presentation order for timeline retrieval.
///
/// Newest-first is the display default. Verification always walks
/// oldest-first regardless of this choice; the two orders parameterize
/// independent presentations of the same append-ordered sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Append an event as the new tip of the entity's chain and return the
    /// stored record.
    fn append_event(
        &self,
        entity_id: &EntityId,
        event_type: EventType,
        data: Value,
        actor_id: ActorId,
    ) -> Result<LedgerEvent, LedgerError>;
}

/// Read boundary for ledger query and verification operations.
pub trait LedgerReader: Send + Sync {
    /// All events for the entity in the requested presentation order.
    ///
    /// An entity with no events yields an empty vector, not an error.
    fn timeline(
        &self,
        entity_id: &EntityId,
        order: TimelineOrder,
    ) -> Result<Vec<LedgerEvent>, LedgerError>;

    /// Re-derive every hash in the entity's chain from genesis to tip.
    fn verify_integrity(&self, entity_id: &EntityId) -> Result<IntegrityReport, LedgerError>;

    /// The current tip of the entity's chain, if any.
    fn tip(&self, entity_id: &EntityId) -> Result<Option<LedgerEvent>, LedgerError>;

    /// Number of events recorded for the entity.
    fn event_count(&self, entity_id: &EntityId) -> Result<u64, LedgerError>;

    /// All entities with at least one event.
    fn entities(&self) -> Result<Vec<EntityId>, LedgerError>;
}
