//! Submission pipeline: validate, dedupe, route, emit, persist.

use super::EvidenceKeeper;
use crate::context::Context;
use crate::domain::{Evidence, EvidenceRecord};
use crate::error::{EvidenceError, EvidenceResult};
use crate::events::Event;
use crate::metrics;
use crate::ports::outbound::{SlashingKeeper, StakingKeeper};
use shared_types::hash_to_upper_hex;
use tracing::{debug, info};

impl<K: StakingKeeper, L: SlashingKeeper> EvidenceKeeper<K, L> {
    /// Accept `evidence` into the store.
    ///
    /// Fails with `EvidenceExists` for a known hash,
    /// `NoEvidenceHandlerExists` for an unrouted kind and `InvalidEvidence`
    /// when validation or the handler rejects the record. Fatal handler
    /// errors are returned unwrapped.
    pub fn submit_evidence(&self, ctx: &mut Context<'_>, evidence: &Evidence) -> EvidenceResult<()> {
        let result = self.try_submit(ctx, evidence);
        if let Err(err) = &result {
            metrics::record_evidence_rejected(rejection_reason(err));
        }
        result
    }

    fn try_submit(&self, ctx: &mut Context<'_>, evidence: &Evidence) -> EvidenceResult<()> {
        evidence.validate_basic()?;

        let hash = evidence.hash();
        let hash_hex = hash_to_upper_hex(&hash);

        if self.has_evidence(ctx, &hash)? {
            debug!("[qc-18] Rejecting duplicate evidence {}", hash_hex);
            return Err(EvidenceError::EvidenceExists { hash: hash_hex });
        }

        let handler = match self.router().and_then(|router| router.route(evidence.kind())) {
            Some(handler) => handler,
            None => {
                return Err(EvidenceError::NoEvidenceHandlerExists {
                    kind: evidence.kind().to_string(),
                })
            }
        };

        handler
            .handle(ctx, evidence)
            .map_err(EvidenceError::into_invalid_evidence)?;

        ctx.emit_event(Event::submit_evidence(hash_hex.clone()));
        self.set_evidence(ctx, evidence)?;

        info!(
            "[qc-18] Accepted {} evidence {} (height {})",
            evidence.kind(),
            hash_hex,
            evidence.height()
        );
        metrics::record_evidence_submitted();
        Ok(())
    }
}

fn rejection_reason(err: &EvidenceError) -> &'static str {
    match err {
        EvidenceError::EvidenceExists { .. } => "evidence_exists",
        EvidenceError::NoEvidenceHandlerExists { .. } => "no_handler",
        EvidenceError::InvalidEvidence { .. } => "invalid_evidence",
        err if err.is_fatal() => "fatal",
        _ => "other",
    }
}
