//! Read-only queries. Never routes, never writes.

use super::EvidenceKeeper;
use crate::error::{EvidenceError, EvidenceResult};
use crate::ports::inbound::{
    QueryAllEvidenceRequest, QueryAllEvidenceResponse, QueryEvidenceRequest,
    QueryEvidenceResponse,
};
use crate::ports::outbound::{KvReader, SlashingKeeper, StakingKeeper};
use crate::store::EvidenceStore;
use shared_types::{Hash, HASH_LENGTH};

impl<K: StakingKeeper, L: SlashingKeeper> EvidenceKeeper<K, L> {
    pub fn query_evidence<S: KvReader>(
        &self,
        kv: S,
        request: &QueryEvidenceRequest,
    ) -> EvidenceResult<QueryEvidenceResponse> {
        if request.hash.is_empty() {
            return Err(EvidenceError::invalid_request("empty hash"));
        }
        let bytes = hex::decode(&request.hash)
            .map_err(|_| EvidenceError::invalid_request("invalid evidence hash"))?;

        let not_found = || EvidenceError::NoEvidenceExists {
            hash: request.hash.to_uppercase(),
        };
        if bytes.len() != HASH_LENGTH {
            return Err(not_found());
        }
        let mut hash: Hash = [0u8; HASH_LENGTH];
        hash.copy_from_slice(&bytes);

        match EvidenceStore::new(kv).get(&hash)? {
            Some(evidence) => Ok(QueryEvidenceResponse { evidence }),
            None => Err(not_found()),
        }
    }

    pub fn query_all_evidence<S: KvReader>(
        &self,
        kv: S,
        request: &QueryAllEvidenceRequest,
    ) -> EvidenceResult<QueryAllEvidenceResponse> {
        let (evidence, pagination) = EvidenceStore::new(kv)
            .paginate(request.pagination.as_ref(), self.config().page_limits())?;
        Ok(QueryAllEvidenceResponse {
            evidence,
            pagination,
        })
    }
}
