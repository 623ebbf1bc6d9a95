use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cpl_types::{ActorId, EventHash, EventId, EventType, LedgerEvent};

/// Presentation view of a ledger event.
///
/// The public view omits `actorId`; audit views include it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: EventId,
    pub event_type: EventType,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub current_hash: EventHash,
    pub previous_hash: EventHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<ActorId>,
}

impl EventView {
    /// Public view: actor redacted.
    pub fn public(event: &LedgerEvent) -> Self {
        Self::build(event, None)
    }

    /// Audit view: actor included.
    pub fn audit(event: &LedgerEvent) -> Self {
        Self::build(event, Some(event.actor_id.clone()))
    }

    fn build(event: &LedgerEvent, actor_id: Option<ActorId>) -> Self {
        Self {
            id: event.id,
            event_type: event.event_type.clone(),
            data: event.data.clone(),
            timestamp: event.timestamp,
            current_hash: event.current_hash,
            previous_hash: event.previous_hash,
            actor_id,
        }
    }
}
