//! # Execution Context
//!
//! Everything a state transition may observe: the block header, consensus
//! parameters, the (branched) evidence store and the event sink of the
//! current scope.

use crate::domain::{ConsensusParams, EvidenceParams};
use crate::events::{Event, EventManager};
use crate::ports::outbound::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header fields of the block being executed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub height: i64,
    pub time: DateTime<Utc>,
    pub chain_id: String,
}

pub struct Context<'a> {
    header: HeaderInfo,
    consensus_params: ConsensusParams,
    store: &'a mut (dyn KeyValueStore + 'a),
    events: EventManager,
}

impl<'a> Context<'a> {
    pub fn new(
        header: HeaderInfo,
        consensus_params: ConsensusParams,
        store: &'a mut (dyn KeyValueStore + 'a),
    ) -> Self {
        Self {
            header,
            consensus_params,
            store,
            events: EventManager::new(),
        }
    }

    pub fn header(&self) -> &HeaderInfo {
        &self.header
    }

    pub fn block_height(&self) -> i64 {
        self.header.height
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.header.time
    }

    pub fn consensus_params(&self) -> &ConsensusParams {
        &self.consensus_params
    }

    pub fn evidence_params(&self) -> Option<&EvidenceParams> {
        self.consensus_params.evidence.as_ref()
    }

    pub fn kv(&self) -> &(dyn KeyValueStore + 'a) {
        &*self.store
    }

    pub fn kv_mut(&mut self) -> &mut (dyn KeyValueStore + 'a) {
        &mut *self.store
    }

    pub fn emit_event(&mut self, event: Event) {
        self.events.emit(event);
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events.into_events()
    }
}
