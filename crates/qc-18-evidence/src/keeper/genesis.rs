//! Genesis import and export.

use super::EvidenceKeeper;
use crate::context::Context;
use crate::domain::{Evidence, EvidenceRecord};
use crate::error::{EvidenceError, EvidenceResult};
use crate::ports::outbound::{SlashingKeeper, StakingKeeper};
use serde::{Deserialize, Serialize};
use shared_types::hash_to_upper_hex;
use tracing::info;

/// `{ "evidence": [ ... ] }`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl GenesisState {
    pub fn new(evidence: Vec<Evidence>) -> Self {
        Self { evidence }
    }

    /// Every record must pass stateless validation.
    pub fn validate(&self) -> EvidenceResult<()> {
        for (index, evidence) in self.evidence.iter().enumerate() {
            evidence.validate_basic().map_err(|err| EvidenceError::InvalidGenesis {
                reason: format!("evidence #{index}: {err}"),
            })?;
        }
        Ok(())
    }
}

impl<K: StakingKeeper, L: SlashingKeeper> EvidenceKeeper<K, L> {
    /// Restore already-adjudicated evidence. No handler runs.
    pub fn init_genesis(&self, ctx: &mut Context<'_>, genesis: &GenesisState) -> EvidenceResult<()> {
        genesis.validate()?;

        for evidence in &genesis.evidence {
            let hash = evidence.hash();
            if self.has_evidence(ctx, &hash)? {
                return Err(EvidenceError::DuplicateGenesisEvidence {
                    hash: hash_to_upper_hex(&hash),
                });
            }
            self.set_evidence(ctx, evidence)?;
        }

        info!(
            "[qc-18] Imported {} evidence records from genesis",
            genesis.evidence.len()
        );
        Ok(())
    }

    /// Every stored record, ascending by hash.
    pub fn export_genesis(&self, ctx: &Context<'_>) -> EvidenceResult<GenesisState> {
        Ok(GenesisState::new(self.get_all_evidence(ctx)?))
    }
}
