use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hash::EventHash;
use crate::id::{ActorId, EntityId, EventId, EventType};

/// One immutable entry in an entity's hash chain.
///
/// `current_hash` is computed over the canonical serialization of
/// `{entityId, eventType, data, timestamp, actorId}` concatenated with
/// `previous_hash`, so mutating any field after creation invalidates this
/// event's hash and every link after it. Events are never updated or
/// deleted once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    pub id: EventId,
    pub entity_id: EntityId,
    /// 1-based position in the entity's chain, assigned at append time.
    pub seq: u64,
    pub event_type: EventType,
    /// Caller-defined payload; opaque to the ledger beyond its role as hash
    /// input.
    pub data: Value,
    /// Assigned by the ledger at append time; non-decreasing per entity.
    pub timestamp: DateTime<Utc>,
    pub actor_id: ActorId,
    /// `current_hash` of the predecessor, or the genesis constant for the
    /// first event of a chain.
    pub previous_hash: EventHash,
    pub current_hash: EventHash,
}

impl LedgerEvent {
    /// Returns `true` if this event links directly to genesis.
    pub fn is_genesis_event(&self) -> bool {
        self.previous_hash.is_genesis()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event() -> LedgerEvent {
        LedgerEvent {
            id: EventId::new(),
            entity_id: EntityId::new("P1").unwrap(),
            seq: 1,
            event_type: EventType::new("PROJECT_CREATED").unwrap(),
            data: json!({"budget": 1000}),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            actor_id: ActorId::new("U1"),
            previous_hash: EventHash::genesis(),
            current_hash: EventHash::from_digest([7; 32]),
        }
    }

    #[test]
    fn genesis_link_detection() {
        let mut e = event();
        assert!(e.is_genesis_event());
        e.previous_hash = EventHash::from_digest([1; 32]);
        assert!(!e.is_genesis_event());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(event()).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("entityId"));
        assert!(object.contains_key("eventType"));
        assert!(object.contains_key("actorId"));
        assert!(object.contains_key("previousHash"));
        assert!(object.contains_key("currentHash"));
    }

    #[test]
    fn serde_roundtrip() {
        let e = event();
        let json = serde_json::to_string(&e).unwrap();
        let parsed: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(e, parsed);
    }
}
