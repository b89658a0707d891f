//! Driving Ports (API - Inbound)
//!
//! What the host calls: block lifecycle, message delivery and read-only
//! queries against committed state.

use crate::context::HeaderInfo;
use crate::domain::{ConsensusParams, Evidence, Misbehavior, MsgSubmitEvidence, MsgSubmitEvidenceResponse};
use crate::error::EvidenceResult;
use crate::events::Event;
use crate::keeper::{EquivocationOutcome, GenesisState};
use serde::{Deserialize, Serialize};
use shared_types::{PageRequest, PageResponse};

/// Block-level inputs shared by every call within one block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub header: HeaderInfo,
    pub consensus_params: ConsensusParams,
}

/// Result of begin-block ingestion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeginBlockResult {
    pub outcomes: Vec<EquivocationOutcome>,
    pub events: Vec<Event>,
}

/// Result of a delivered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliverResult<T> {
    pub response: T,
    pub events: Vec<Event>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEvidenceRequest {
    /// Hex-encoded evidence hash (either case)
    pub hash: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEvidenceResponse {
    pub evidence: Evidence,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAllEvidenceRequest {
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAllEvidenceResponse {
    pub evidence: Vec<Evidence>,
    pub pagination: PageResponse,
}

/// Read-only queries over committed state.
pub trait EvidenceQueryApi {
    fn evidence(&self, request: &QueryEvidenceRequest) -> EvidenceResult<QueryEvidenceResponse>;

    fn all_evidence(
        &self,
        request: &QueryAllEvidenceRequest,
    ) -> EvidenceResult<QueryAllEvidenceResponse>;
}

/// State transitions driven by the block executor.
///
/// Calls are sequential: begin-block first, then each message of the block.
/// A failed call leaves committed state untouched.
pub trait EvidenceApi {
    fn init_genesis(&self, block: &BlockInfo, genesis: &GenesisState) -> EvidenceResult<()>;

    fn export_genesis(&self) -> EvidenceResult<GenesisState>;

    fn begin_block(
        &self,
        block: &BlockInfo,
        misbehavior: &[Misbehavior],
    ) -> EvidenceResult<BeginBlockResult>;

    fn deliver_submit_evidence(
        &self,
        block: &BlockInfo,
        msg: &MsgSubmitEvidence,
    ) -> EvidenceResult<DeliverResult<MsgSubmitEvidenceResponse>>;
}
