use cpl_types::{EntityId, EventHash, LedgerEvent};

use crate::error::{StoreError, StoreResult};

/// Durable ordered event log: one append-only sequence per entity.
///
/// All implementations must satisfy these invariants:
/// - Conditional append: `append` succeeds only if `event.seq` is exactly
///   one past the current tip (1 for an empty chain) and
///   `event.previous_hash` equals the tip's `current_hash`. Anything else is
///   a conflict and nothing is written. The log checks linkage fields only;
///   digest correctness is the engine's and verifier's concern.
/// - An event is either fully persisted with both hashes or not visible at
///   all; readers never observe a partial record.
/// - Events are never rewritten in place.
/// - Reads return copies; callers cannot mutate stored state.
pub trait EventLog: Send + Sync {
    /// Conditionally append an event as the new tip of its entity's chain.
    fn append(&self, event: &LedgerEvent) -> StoreResult<()>;

    /// The most recently appended event for the entity, if any.
    fn tip(&self, entity: &EntityId) -> StoreResult<Option<LedgerEvent>>;

    /// All events for the entity in append order (oldest first).
    ///
    /// An unknown entity yields an empty vector, not an error.
    fn read_all(&self, entity: &EntityId) -> StoreResult<Vec<LedgerEvent>>;

    /// Number of events recorded for the entity.
    fn event_count(&self, entity: &EntityId) -> StoreResult<u64>;

    /// All entities with at least one event, in sorted order.
    fn entities(&self) -> StoreResult<Vec<EntityId>>;
}

/// Conditional-append check shared by log backends.
pub(crate) fn check_extends_tip(
    tip: Option<&LedgerEvent>,
    event: &LedgerEvent,
) -> StoreResult<()> {
    let (expected_seq, expected_previous) = match tip {
        Some(t) => (t.seq + 1, t.current_hash),
        None => (1, EventHash::genesis()),
    };

    if event.seq != expected_seq {
        return Err(StoreError::SeqConflict {
            entity: event.entity_id.clone(),
            attempted: event.seq,
            expected: expected_seq,
        });
    }
    if event.previous_hash != expected_previous {
        return Err(StoreError::PrevHashMismatch {
            entity: event.entity_id.clone(),
            seq: event.seq,
        });
    }
    Ok(())
}
