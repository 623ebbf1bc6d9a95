use std::path::Path;

use serde_json::Value;

use cpl_ledger::{
    IntegrityReport, LedgerEngine, LedgerReader, LedgerWriter, ProjectionBuilder,
    StatusProjection, TimelineOrder,
};
use cpl_store::{EventLog, FileEventLog, InMemoryEventLog, SyncMode};
use cpl_types::{ActorId, EntityId, EventType, LedgerEvent};

use crate::error::SdkResult;
use crate::view::EventView;

/// High-level civic project ledger.
///
/// The entity service records business actions through
/// [`record_action`](Self::record_action); presentation layers read
/// timelines, integrity reports, and status snapshots. Entity existence and
/// authorization checks stay with the caller — beyond requiring non-empty
/// identifiers, the ledger trusts its input.
pub struct CivicLedger<L: EventLog> {
    engine: LedgerEngine<L>,
}

impl CivicLedger<InMemoryEventLog> {
    /// Ledger over an in-memory log (tests, demos, embedding).
    pub fn in_memory() -> Self {
        Self::with_log(InMemoryEventLog::new())
    }
}

impl CivicLedger<FileEventLog> {
    /// Ledger over a crash-recoverable segment file, fsynced per append.
    pub fn open(path: &Path) -> SdkResult<Self> {
        let log = FileEventLog::open(path, SyncMode::EveryWrite)?;
        Ok(Self::with_log(log))
    }
}

impl<L: EventLog> CivicLedger<L> {
    /// Ledger over a caller-provided log backend.
    pub fn with_log(log: L) -> Self {
        Self {
            engine: LedgerEngine::new(log),
        }
    }

    /// Record a business action as the next event in the entity's chain and
    /// return the stored record.
    pub fn record_action(
        &self,
        entity_id: &str,
        event_type: &str,
        data: Value,
        actor_id: &str,
    ) -> SdkResult<LedgerEvent> {
        let entity_id = EntityId::new(entity_id)?;
        let event_type = EventType::new(event_type)?;
        Ok(self
            .engine
            .append_event(&entity_id, event_type, data, ActorId::new(actor_id))?)
    }

    /// Newest-first timeline for display; actor ids redacted.
    pub fn timeline(&self, entity_id: &str) -> SdkResult<Vec<EventView>> {
        let entity_id = EntityId::new(entity_id)?;
        let events = self.engine.timeline(&entity_id, TimelineOrder::NewestFirst)?;
        Ok(events.iter().map(EventView::public).collect())
    }

    /// Newest-first timeline with actor ids, for audit views.
    pub fn audit_timeline(&self, entity_id: &str) -> SdkResult<Vec<EventView>> {
        let entity_id = EntityId::new(entity_id)?;
        let events = self.engine.timeline(&entity_id, TimelineOrder::NewestFirst)?;
        Ok(events.iter().map(EventView::audit).collect())
    }

    /// Re-derive the entity's whole chain and report whether it holds.
    pub fn integrity(&self, entity_id: &str) -> SdkResult<IntegrityReport> {
        let entity_id = EntityId::new(entity_id)?;
        Ok(self.engine.verify_integrity(&entity_id)?)
    }

    /// Current status folded from the entity's timeline.
    pub fn status(&self, entity_id: &str) -> SdkResult<StatusProjection> {
        let entity_id = EntityId::new(entity_id)?;
        Ok(ProjectionBuilder::status(&self.engine, &entity_id)?)
    }

    /// The wrapped engine, for direct trait-level access.
    pub fn engine(&self) -> &LedgerEngine<L> {
        &self.engine
    }
}
