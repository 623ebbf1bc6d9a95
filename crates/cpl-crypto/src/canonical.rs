use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use cpl_types::{ActorId, EntityId, EventType, LedgerEvent};

/// Errors from canonical serialization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The hash-input fields in their canonical order.
///
/// Key order is fixed by field order (`entityId`, `eventType`, `data`,
/// `timestamp`, `actorId`); nested `data` objects serialize with sorted
/// keys, so the byte form is stable across processes and platforms. `seq`,
/// `id`, and the hash fields themselves are deliberately not part of the
/// digest input.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalEvent<'a> {
    entity_id: &'a EntityId,
    event_type: &'a EventType,
    data: &'a Value,
    timestamp: &'a DateTime<Utc>,
    actor_id: &'a ActorId,
}

/// Canonical byte form of the hash-input fields.
pub fn canonical_event_bytes(
    entity_id: &EntityId,
    event_type: &EventType,
    data: &Value,
    timestamp: &DateTime<Utc>,
    actor_id: &ActorId,
) -> Result<Vec<u8>, CryptoError> {
    serde_json::to_vec(&CanonicalEvent {
        entity_id,
        event_type,
        data,
        timestamp,
        actor_id,
    })
    .map_err(|e| CryptoError::Serialization(e.to_string()))
}

/// Canonical byte form of a stored event's own hash-input fields, used when
/// re-deriving its digest during verification.
pub fn canonical_payload(event: &LedgerEvent) -> Result<Vec<u8>, CryptoError> {
    canonical_event_bytes(
        &event.entity_id,
        &event.event_type,
        &event.data,
        &event.timestamp,
        &event.actor_id,
    )
}
