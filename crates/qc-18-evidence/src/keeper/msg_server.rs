//! `MsgSubmitEvidence` handling.

use super::EvidenceKeeper;
use crate::context::Context;
use crate::domain::{EvidenceRecord, MsgSubmitEvidence, MsgSubmitEvidenceResponse};
use crate::error::EvidenceResult;
use crate::events::Event;
use crate::ports::outbound::{SlashingKeeper, StakingKeeper};

impl<K: StakingKeeper, L: SlashingKeeper> EvidenceKeeper<K, L> {
    pub fn handle_submit_evidence(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgSubmitEvidence,
    ) -> EvidenceResult<MsgSubmitEvidenceResponse> {
        msg.validate_basic(self.account_codec())?;

        self.submit_evidence(ctx, &msg.evidence)?;
        ctx.emit_event(Event::message(msg.submitter.clone()));

        Ok(MsgSubmitEvidenceResponse {
            hash: msg.evidence.hash(),
        })
    }
}
