//! Begin-block ingestion of byzantine-validator reports.

use super::{EquivocationOutcome, EvidenceKeeper};
use crate::context::Context;
use crate::domain::{Misbehavior, MisbehaviorType};
use crate::error::{EvidenceError, EvidenceResult};
use crate::metrics;
use crate::ports::outbound::{SlashingKeeper, StakingKeeper};
use tracing::{debug, warn};

impl<K: StakingKeeper, L: SlashingKeeper> EvidenceKeeper<K, L> {
    /// Adjudicate every report in the order consensus supplied them.
    ///
    /// Duplicate votes and light-client attacks are both handled as
    /// equivocation. Unknown types are skipped. Any error aborts the block.
    pub fn begin_block(
        &self,
        ctx: &mut Context<'_>,
        misbehavior: &[Misbehavior],
    ) -> EvidenceResult<Vec<EquivocationOutcome>> {
        let handler = self.equivocation_handler();
        let mut outcomes = Vec::with_capacity(misbehavior.len());

        for report in misbehavior {
            metrics::record_begin_block_report(report.kind.label());

            match report.kind {
                MisbehaviorType::DuplicateVote | MisbehaviorType::LightClientAttack => {
                    let evidence = report
                        .to_equivocation(self.consensus_codec())
                        .map_err(|e| {
                            EvidenceError::dependency(
                                "consensus",
                                format!("misbehavior report with unusable validator address: {e}"),
                            )
                        })?;
                    debug!(
                        "[qc-18] Processing {} report for {} at height {}",
                        report.kind.label(),
                        evidence.consensus_address,
                        evidence.height
                    );
                    outcomes.push(handler.handle_equivocation(ctx, &evidence)?);
                }
                MisbehaviorType::Unknown(code) => {
                    warn!(
                        "[qc-18] Ignoring misbehavior report with unknown type {} at height {}",
                        code, report.height
                    );
                }
            }
        }

        Ok(outcomes)
    }
}
