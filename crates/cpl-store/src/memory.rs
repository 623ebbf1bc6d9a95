use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cpl_types::{EntityId, LedgerEvent};

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_extends_tip, EventLog};

type Chain = Arc<RwLock<Vec<LedgerEvent>>>;

/// In-memory event log for tests, local demos, and embedding.
///
/// Each entity's chain sits behind its own lock; the outer map lock is held
/// only long enough to look up or create a chain handle, so appends to
/// different entities do not contend and reads run concurrently with
/// unrelated appends.
#[derive(Default)]
pub struct InMemoryEventLog {
    chains: RwLock<HashMap<EntityId, Chain>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn chain(&self, entity: &EntityId) -> StoreResult<Option<Chain>> {
        let chains = self
            .chains
            .read()
            .map_err(|_| poisoned("chain map"))?;
        Ok(chains.get(entity).cloned())
    }

    fn chain_or_create(&self, entity: &EntityId) -> StoreResult<Chain> {
        if let Some(chain) = self.chain(entity)? {
            return Ok(chain);
        }
        let mut chains = self
            .chains
            .write()
            .map_err(|_| poisoned("chain map"))?;
        Ok(chains.entry(entity.clone()).or_default().clone())
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, event: &LedgerEvent) -> StoreResult<()> {
        let chain = self.chain_or_create(&event.entity_id)?;
        let mut chain = chain.write().map_err(|_| poisoned("chain"))?;
        check_extends_tip(chain.last(), event)?;
        chain.push(event.clone());
        Ok(())
    }

    fn tip(&self, entity: &EntityId) -> StoreResult<Option<LedgerEvent>> {
        match self.chain(entity)? {
            None => Ok(None),
            Some(chain) => {
                let chain = chain.read().map_err(|_| poisoned("chain"))?;
                Ok(chain.last().cloned())
            }
        }
    }

    fn read_all(&self, entity: &EntityId) -> StoreResult<Vec<LedgerEvent>> {
        match self.chain(entity)? {
            None => Ok(Vec::new()),
            Some(chain) => {
                let chain = chain.read().map_err(|_| poisoned("chain"))?;
                Ok(chain.clone())
            }
        }
    }

    fn event_count(&self, entity: &EntityId) -> StoreResult<u64> {
        match self.chain(entity)? {
            None => Ok(0),
            Some(chain) => {
                let chain = chain.read().map_err(|_| poisoned("chain"))?;
                Ok(chain.len() as u64)
            }
        }
    }

    fn entities(&self) -> StoreResult<Vec<EntityId>> {
        let chains = self
            .chains
            .read()
            .map_err(|_| poisoned("chain map"))?;
        let mut ids: Vec<_> = chains.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

fn poisoned(what: &str) -> StoreError {
    StoreError::Unavailable(format!("{what} lock poisoned"))
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use cpl_types::{ActorId, EventHash, EventId, EventType};
    use serde_json::json;

    use super::*;

    // The store checks linkage fields, not digest correctness, so test
    // events can carry fabricated hashes.
    fn event(entity: &EntityId, seq: u64, previous_hash: EventHash) -> LedgerEvent {
        LedgerEvent {
            id: EventId::new(),
            entity_id: entity.clone(),
            seq,
            event_type: EventType::new("TEST").unwrap(),
            data: json!({"n": seq}),
            timestamp: DateTime::from_timestamp(1_700_000_000 + seq as i64, 0).unwrap(),
            actor_id: ActorId::new("tester"),
            previous_hash,
            current_hash: EventHash::from_digest([seq as u8; 32]),
        }
    }

    fn entity(id: &str) -> EntityId {
        EntityId::new(id).unwrap()
    }

    #[test]
    fn append_and_read_roundtrip() {
        let log = InMemoryEventLog::new();
        let p1 = entity("P1");

        let first = event(&p1, 1, EventHash::genesis());
        log.append(&first).unwrap();
        let second = event(&p1, 2, first.current_hash);
        log.append(&second).unwrap();

        let all = log.read_all(&p1).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first);
        assert_eq!(all[1], second);
        assert_eq!(log.tip(&p1).unwrap().unwrap(), second);
        assert_eq!(log.event_count(&p1).unwrap(), 2);
    }

    #[test]
    fn first_append_must_start_at_seq_one() {
        let log = InMemoryEventLog::new();
        let p1 = entity("P1");

        let err = log.append(&event(&p1, 2, EventHash::genesis())).unwrap_err();
        assert!(matches!(
            err,
            StoreError::SeqConflict {
                attempted: 2,
                expected: 1,
                ..
            }
        ));
    }

    #[test]
    fn stale_seq_is_a_conflict() {
        let log = InMemoryEventLog::new();
        let p1 = entity("P1");

        let first = event(&p1, 1, EventHash::genesis());
        log.append(&first).unwrap();

        // A second writer that also read the empty chain loses the race.
        let err = log.append(&event(&p1, 1, EventHash::genesis())).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn stale_previous_hash_is_a_conflict() {
        let log = InMemoryEventLog::new();
        let p1 = entity("P1");

        let first = event(&p1, 1, EventHash::genesis());
        log.append(&first).unwrap();

        let err = log
            .append(&event(&p1, 2, EventHash::from_digest([9; 32])))
            .unwrap_err();
        assert!(matches!(err, StoreError::PrevHashMismatch { seq: 2, .. }));
    }

    #[test]
    fn unknown_entity_reads_empty() {
        let log = InMemoryEventLog::new();
        let ghost = entity("ghost");
        assert!(log.read_all(&ghost).unwrap().is_empty());
        assert!(log.tip(&ghost).unwrap().is_none());
        assert_eq!(log.event_count(&ghost).unwrap(), 0);
    }

    #[test]
    fn chains_are_isolated() {
        let log = InMemoryEventLog::new();
        let p1 = entity("P1");
        let p2 = entity("P2");

        log.append(&event(&p1, 1, EventHash::genesis())).unwrap();
        log.append(&event(&p2, 1, EventHash::genesis())).unwrap();

        assert_eq!(log.event_count(&p1).unwrap(), 1);
        assert_eq!(log.event_count(&p2).unwrap(), 1);
        assert_eq!(log.read_all(&p1).unwrap()[0].entity_id, p1);
    }

    #[test]
    fn entities_are_sorted() {
        let log = InMemoryEventLog::new();
        for id in ["P3", "P1", "P2"] {
            log.append(&event(&entity(id), 1, EventHash::genesis()))
                .unwrap();
        }
        let ids: Vec<_> = log
            .entities()
            .unwrap()
            .into_iter()
            .map(|e| e.as_str().to_string())
            .collect();
        assert_eq!(ids, ["P1", "P2", "P3"]);
    }

    #[test]
    fn reads_return_copies() {
        let log = InMemoryEventLog::new();
        let p1 = entity("P1");
        log.append(&event(&p1, 1, EventHash::genesis())).unwrap();

        let mut copy = log.read_all(&p1).unwrap();
        copy[0].data = json!({"mutated": true});

        assert_eq!(log.read_all(&p1).unwrap()[0].data, json!({"n": 1}));
    }
}
