//! # Equivocation Handler
//!
//! Turns a double-sign record into slashing, jailing and tombstoning.
//!
//! ```text
//!  resolve identifier ─→ pubkey? ─no─→ ignore
//!          │
//!          ▼
//!  stale (time AND blocks)? ─yes─→ ignore
//!          │
//!          ▼
//!  validator bonded? ─no─→ ignore
//!          │
//!          ▼
//!  operator pubkey? ─no─→ ignore
//!          │
//!          ▼
//!  signing info? ─no─→ FATAL
//!          │
//!          ▼
//!  tombstoned? ─yes─→ ignore
//!          │
//!          ▼
//!  slash → jail → jail_until(9999) → tombstone → record
//! ```
//!
//! Every branch before the slash is a soft no-op. From the slash onwards any
//! error is a broken dependency and is returned.

use crate::context::Context;
use crate::domain::{
    double_sign_jail_end_time, Equivocation, Evidence, EvidenceHandler, EvidenceRecord,
    Infraction, VALIDATOR_UPDATE_DELAY,
};
use crate::error::{EvidenceError, EvidenceResult};
use crate::metrics;
use crate::ports::outbound::{SlashingKeeper, StakingKeeper};
use crate::store::EvidenceStore;
use shared_types::{AddressCodec, ConsAddress};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of adjudicating one equivocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EquivocationOutcome {
    /// Slashed, jailed and tombstoned.
    Punished {
        validator: ConsAddress,
        distribution_height: i64,
    },
    /// The slashing subsystem has no public key for the address.
    UnknownValidator,
    /// Older than both the block and the time budget.
    Stale,
    /// No validator, or the validator is unbonded.
    NotBonded,
    /// The operator's public key could not be resolved.
    OperatorKeyMissing,
    /// Already punished for an earlier equivocation.
    AlreadyTombstoned,
}

impl EquivocationOutcome {
    pub fn is_punished(&self) -> bool {
        matches!(self, EquivocationOutcome::Punished { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            EquivocationOutcome::Punished { .. } => "punished",
            EquivocationOutcome::UnknownValidator => "unknown_validator",
            EquivocationOutcome::Stale => "stale",
            EquivocationOutcome::NotBonded => "not_bonded",
            EquivocationOutcome::OperatorKeyMissing => "operator_key_missing",
            EquivocationOutcome::AlreadyTombstoned => "tombstoned",
        }
    }
}

pub struct EquivocationHandler<K, L> {
    staking: Arc<K>,
    slashing: Arc<L>,
    consensus_codec: AddressCodec,
}

impl<K: StakingKeeper, L: SlashingKeeper> EquivocationHandler<K, L> {
    pub fn new(staking: Arc<K>, slashing: Arc<L>, consensus_codec: AddressCodec) -> Self {
        Self {
            staking,
            slashing,
            consensus_codec,
        }
    }

    /// Adjudicate `evidence`. Soft no-ops are reported through the outcome.
    pub fn handle_equivocation(
        &self,
        ctx: &mut Context<'_>,
        evidence: &Equivocation,
    ) -> EvidenceResult<EquivocationOutcome> {
        let outcome = self.adjudicate(ctx, evidence)?;
        if !outcome.is_punished() {
            metrics::record_evidence_ignored(outcome.label());
        }
        Ok(outcome)
    }

    fn adjudicate(
        &self,
        ctx: &mut Context<'_>,
        evidence: &Equivocation,
    ) -> EvidenceResult<EquivocationOutcome> {
        let reported = evidence
            .consensus_address(&self.consensus_codec)
            .map_err(|e| {
                EvidenceError::invalid_evidence(format!(
                    "invalid consensus address {:?}: {e}",
                    evidence.consensus_address
                ))
            })?;
        let cons_addr = self.staking.validator_identifier(ctx, &reported)?;

        if let Err(err) = self.slashing.get_pubkey(ctx, &cons_addr) {
            // Not tracked by this chain (pre-genesis or rotated away).
            debug!(
                "[qc-18] Ignoring evidence for unknown validator {} at height {}: {}",
                evidence.consensus_address, evidence.height, err
            );
            return Ok(EquivocationOutcome::UnknownValidator);
        }

        if let Some(params) = ctx.evidence_params() {
            let age_duration = ctx.block_time() - evidence.time;
            let age_blocks = ctx.block_height().saturating_sub(evidence.height);
            let too_old = match chrono::Duration::from_std(params.max_age_duration) {
                Ok(max_duration) => age_duration > max_duration,
                Err(_) => false,
            };
            if too_old && age_blocks > params.max_age_num_blocks {
                info!(
                    "[qc-18] Ignoring stale equivocation by {} at height {}: age {}s / {} blocks exceeds {}s / {} blocks",
                    evidence.consensus_address,
                    evidence.height,
                    age_duration.num_seconds(),
                    age_blocks,
                    params.max_age_duration.as_secs(),
                    params.max_age_num_blocks
                );
                return Ok(EquivocationOutcome::Stale);
            }
        }

        let validator = match self.staking.validator_by_cons_addr(ctx, &cons_addr) {
            Ok(Some(validator)) if !validator.is_unbonded() => validator,
            Ok(_) => {
                debug!(
                    "[qc-18] Ignoring equivocation by {}: validator absent or unbonded",
                    evidence.consensus_address
                );
                return Ok(EquivocationOutcome::NotBonded);
            }
            Err(err) => {
                warn!(
                    "[qc-18] Ignoring equivocation by {}: validator lookup failed: {}",
                    evidence.consensus_address, err
                );
                return Ok(EquivocationOutcome::NotBonded);
            }
        };

        if !validator.operator().is_empty() {
            if let Err(err) = self.slashing.get_pubkey(ctx, &cons_addr) {
                debug!(
                    "[qc-18] Ignoring equivocation by {}: operator {} has no consensus key: {}",
                    evidence.consensus_address,
                    validator.operator(),
                    err
                );
                return Ok(EquivocationOutcome::OperatorKeyMissing);
            }
        }

        if !self.slashing.has_validator_signing_info(ctx, &cons_addr) {
            return Err(EvidenceError::invariant(format!(
                "expected signing info for validator {} but not found",
                evidence.consensus_address
            )));
        }

        if self.slashing.is_tombstoned(ctx, &cons_addr) {
            info!(
                "[qc-18] Ignoring equivocation by {} at height {}: validator already tombstoned",
                evidence.consensus_address, evidence.height
            );
            return Ok(EquivocationOutcome::AlreadyTombstoned);
        }

        // May be negative; the slashing layer then finds no unbonding
        // entries to cover.
        let distribution_height = evidence
            .height
            .checked_sub(VALIDATOR_UPDATE_DELAY)
            .ok_or_else(|| {
                EvidenceError::dependency(
                    "consensus",
                    format!("infraction height {} out of range", evidence.height),
                )
            })?;

        let fraction = self.slashing.slash_fraction_double_sign(ctx)?;
        self.slashing.slash_with_infraction_reason(
            ctx,
            &cons_addr,
            fraction,
            evidence.validator_power(),
            distribution_height,
            Infraction::DoubleSign,
        )?;

        if !validator.is_jailed() {
            self.slashing.jail(ctx, &cons_addr)?;
        }
        self.slashing
            .jail_until(ctx, &cons_addr, double_sign_jail_end_time())?;
        self.slashing.tombstone(ctx, &cons_addr)?;

        let record = Evidence::Equivocation(evidence.clone());
        EvidenceStore::new(ctx.kv_mut()).set(&record.hash(), &record)?;

        info!(
            "[qc-18] 🔨 Punished equivocation by {} at height {} (power {}, fraction {}, distribution height {})",
            evidence.consensus_address,
            evidence.height,
            evidence.power,
            fraction,
            distribution_height
        );
        metrics::record_equivocation_punished();

        Ok(EquivocationOutcome::Punished {
            validator: cons_addr,
            distribution_height,
        })
    }
}

impl<K: StakingKeeper, L: SlashingKeeper> EvidenceHandler for EquivocationHandler<K, L> {
    fn handle(&self, ctx: &mut Context<'_>, evidence: &Evidence) -> EvidenceResult<()> {
        match evidence {
            Evidence::Equivocation(e) => self.handle_equivocation(ctx, e).map(|_| ()),
        }
    }
}
