use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use cpl_crypto::{canonical_event_bytes, ChainError, ChainVerifier, EventHasher};
use cpl_store::EventLog;
use cpl_types::{ActorId, EntityId, EventHash, EventId, EventType, LedgerEvent};

use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter, TimelineOrder};
use crate::validation::IntegrityReport;

/// Bounded retry budget for conditional-append conflicts.
const MAX_APPEND_ATTEMPTS: u32 = 8;

/// The ledger engine: hash-linked append, timeline retrieval, and integrity
/// verification over an injected event log.
///
/// The engine owns no global state; independent instances over independent
/// logs are fully isolated. Per-entity append serialization is delegated to
/// the log's conditional append: the engine reads the tip, computes the new
/// link, and submits; if a concurrent append won the race it re-reads the
/// tip and recomputes. Exactly one of two racing appends observes the other
/// as its predecessor.
pub struct LedgerEngine<L: EventLog> {
    log: L,
}

impl<L: EventLog> LedgerEngine<L> {
    /// Create an engine over the given event log.
    pub fn new(log: L) -> Self {
        Self { log }
    }

    /// The underlying event log.
    pub fn log(&self) -> &L {
        &self.log
    }
}

impl<L: EventLog> LedgerWriter for LedgerEngine<L> {
    fn append_event(
        &self,
        entity_id: &EntityId,
        event_type: EventType,
        data: Value,
        actor_id: ActorId,
    ) -> Result<LedgerEvent, LedgerError> {
        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let tip = self.log.tip(entity_id)?;
            let (seq, previous_hash) = match &tip {
                Some(t) => (t.seq + 1, t.current_hash),
                None => (1, EventHash::genesis()),
            };

            // Per-entity timestamps never run backwards, even if the wall
            // clock does.
            let now = Utc::now();
            let timestamp = match &tip {
                Some(t) if t.timestamp > now => t.timestamp,
                _ => now,
            };

            let payload =
                canonical_event_bytes(entity_id, &event_type, &data, &timestamp, &actor_id)?;
            let current_hash = EventHasher::link(&payload, &previous_hash);

            let event = LedgerEvent {
                id: EventId::new(),
                entity_id: entity_id.clone(),
                seq,
                event_type: event_type.clone(),
                data: data.clone(),
                timestamp,
                actor_id: actor_id.clone(),
                previous_hash,
                current_hash,
            };

            match self.log.append(&event) {
                Ok(()) => {
                    debug!(
                        entity = %entity_id,
                        seq,
                        hash = %event.current_hash.short_hex(),
                        "event appended"
                    );
                    return Ok(event);
                }
                Err(e) if e.is_conflict() => {
                    debug!(entity = %entity_id, attempt, "append conflict; re-reading tip");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            entity = %entity_id,
            attempts = MAX_APPEND_ATTEMPTS,
            "append retries exhausted"
        );
        Err(LedgerError::AppendContention {
            entity: entity_id.clone(),
            attempts: MAX_APPEND_ATTEMPTS,
        })
    }
}

impl<L: EventLog> LedgerReader for LedgerEngine<L> {
    fn timeline(
        &self,
        entity_id: &EntityId,
        order: TimelineOrder,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let mut events = self.log.read_all(entity_id)?;
        if order == TimelineOrder::NewestFirst {
            events.reverse();
        }
        Ok(events)
    }

    fn verify_integrity(&self, entity_id: &EntityId) -> Result<IntegrityReport, LedgerError> {
        let events = self.log.read_all(entity_id)?;
        let checked = events.len() as u64;

        match ChainVerifier::verify_chain(&events) {
            Ok(()) => Ok(IntegrityReport::valid(entity_id.clone(), checked)),
            Err(ChainError::BrokenLink { index }) | Err(ChainError::HashMismatch { index }) => Ok(
                IntegrityReport::broken(entity_id.clone(), events[index].id, checked),
            ),
            Err(ChainError::Serialization(e)) => Err(LedgerError::Serialization(e)),
        }
    }

    fn tip(&self, entity_id: &EntityId) -> Result<Option<LedgerEvent>, LedgerError> {
        Ok(self.log.tip(entity_id)?)
    }

    fn event_count(&self, entity_id: &EntityId) -> Result<u64, LedgerError> {
        Ok(self.log.event_count(entity_id)?)
    }

    fn entities(&self) -> Result<Vec<EntityId>, LedgerError> {
        Ok(self.log.entities()?)
    }
}
