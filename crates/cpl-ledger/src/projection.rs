use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cpl_types::{EntityId, EventHash, EventType};

use crate::error::LedgerError;
use crate::traits::{LedgerReader, TimelineOrder};

/// Current entity status folded deterministically from its timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusProjection {
    pub entity_id: EntityId,
    pub event_count: u64,
    pub tip_hash: Option<EventHash>,
    pub last_event_type: Option<EventType>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Last-writer-wins merge of every object payload, oldest first.
    pub state: BTreeMap<String, Value>,
}

/// Deterministic projection builders.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    /// Fold an entity's chain oldest-first into its current status.
    ///
    /// Object payloads merge key by key (a later `{"progress": 50}`
    /// overwrites an earlier one); non-object payloads do not contribute to
    /// the merged state.
    pub fn status<R: LedgerReader>(
        reader: &R,
        entity_id: &EntityId,
    ) -> Result<StatusProjection, LedgerError> {
        let events = reader.timeline(entity_id, TimelineOrder::OldestFirst)?;

        let mut state = BTreeMap::new();
        for event in &events {
            if let Value::Object(fields) = &event.data {
                for (key, value) in fields {
                    state.insert(key.clone(), value.clone());
                }
            }
        }

        let last = events.last();
        Ok(StatusProjection {
            entity_id: entity_id.clone(),
            event_count: events.len() as u64,
            tip_hash: last.map(|e| e.current_hash),
            last_event_type: last.map(|e| e.event_type.clone()),
            last_updated: last.map(|e| e.timestamp),
            state,
        })
    }
}
