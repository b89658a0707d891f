//! Transaction messages accepted by the evidence module.

use crate::domain::evidence::{Evidence, EvidenceRecord};
use crate::error::{EvidenceError, EvidenceResult};
use serde::{Deserialize, Serialize};
use shared_types::{AccAddress, AddressCodec, Hash};

/// Submit arbitrary evidence of misbehavior.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitEvidence {
    /// Bech32 account address of the submitter
    pub submitter: String,
    pub evidence: Evidence,
}

impl MsgSubmitEvidence {
    pub fn new(submitter: impl Into<String>, evidence: impl Into<Evidence>) -> Self {
        Self {
            submitter: submitter.into(),
            evidence: evidence.into(),
        }
    }

    /// Stateless checks: submitter address format, then the evidence itself.
    pub fn validate_basic(&self, account_codec: &AddressCodec) -> EvidenceResult<()> {
        self.submitter_address(account_codec)?;
        self.evidence.validate_basic()
    }

    pub fn submitter_address(&self, account_codec: &AddressCodec) -> EvidenceResult<AccAddress> {
        AccAddress::from_bech32(account_codec, &self.submitter).map_err(|e| {
            EvidenceError::invalid_request(format!("invalid submitter address: {e}"))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitEvidenceResponse {
    /// Hash of the submitted evidence
    pub hash: Hash,
}
