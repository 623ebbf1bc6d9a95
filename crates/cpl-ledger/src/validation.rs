use serde::{Deserialize, Serialize};

use cpl_types::{EntityId, EventId};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of a full-chain integrity verification.
///
/// A broken chain is a *successful* verification reporting a negative
/// result; it is never surfaced as an error. Every call re-derives the whole
/// chain — no verification state is cached between calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub entity_id: EntityId,
    pub valid: bool,
    /// Id of the first event at which the chain no longer holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken_at: Option<EventId>,
    pub events_checked: u64,
}

impl IntegrityReport {
    /// Report for a chain that verified end to end.
    pub fn valid(entity_id: EntityId, events_checked: u64) -> Self {
        Self {
            entity_id,
            valid: true,
            broken_at: None,
            events_checked,
        }
    }

    /// Report for a chain that failed at the given event.
    pub fn broken(entity_id: EntityId, broken_at: EventId, events_checked: u64) -> Self {
        Self {
            entity_id,
            valid: false,
            broken_at: Some(broken_at),
            events_checked,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Verify every known entity's chain (audit sweep).
pub fn verify_all<R: LedgerReader>(reader: &R) -> Result<Vec<IntegrityReport>, LedgerError> {
    let mut reports = Vec::new();
    for entity in reader.entities()? {
        reports.push(reader.verify_integrity(&entity)?);
    }
    Ok(reports)
}
