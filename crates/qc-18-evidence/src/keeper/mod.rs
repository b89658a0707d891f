//! # Evidence Keeper
//!
//! Owns the sealed router and the handles to the staking and slashing
//! subsystems. Every state-touching operation takes the [`Context`] of the
//! current execution scope.
//!
//! - `submit`: submission pipeline
//! - `infraction`: equivocation adjudication
//! - `abci`: begin-block ingestion of consensus reports
//! - `genesis`: import/export
//! - `grpc_query`: read-only queries
//! - `msg_server`: `MsgSubmitEvidence` handling

pub mod abci;
pub mod genesis;
pub mod grpc_query;
pub mod infraction;
pub mod msg_server;
pub mod submit;

pub use genesis::GenesisState;
pub use infraction::{EquivocationHandler, EquivocationOutcome};

use crate::config::EvidenceConfig;
use crate::context::Context;
use crate::domain::{Evidence, EvidenceRecord, Router};
use crate::error::EvidenceResult;
use crate::ports::outbound::{SlashingKeeper, StakingKeeper};
use crate::store::EvidenceStore;
use shared_types::{AddressCodec, Hash};
use std::ops::ControlFlow;
use std::sync::Arc;

pub struct EvidenceKeeper<K, L> {
    config: EvidenceConfig,
    account_codec: AddressCodec,
    consensus_codec: AddressCodec,
    staking: Arc<K>,
    slashing: Arc<L>,
    router: Option<Arc<Router>>,
}

impl<K: StakingKeeper, L: SlashingKeeper> EvidenceKeeper<K, L> {
    pub fn new(config: EvidenceConfig, staking: Arc<K>, slashing: Arc<L>) -> Self {
        Self {
            account_codec: config.account_codec(),
            consensus_codec: config.consensus_codec(),
            config,
            staking,
            slashing,
            router: None,
        }
    }

    /// Install the routing table, sealing it if the caller has not.
    ///
    /// # Panics
    ///
    /// If a router was already installed.
    pub fn set_router(&mut self, mut router: Router) {
        if self.router.is_some() {
            panic!("cannot reset a sealed router");
        }
        if !router.sealed() {
            router.seal();
        }
        self.router = Some(Arc::new(router));
    }

    pub fn router(&self) -> Option<&Router> {
        self.router.as_deref()
    }

    /// Handler for equivocation evidence sharing this keeper's dependencies.
    pub fn equivocation_handler(&self) -> EquivocationHandler<K, L> {
        EquivocationHandler::new(
            Arc::clone(&self.staking),
            Arc::clone(&self.slashing),
            self.consensus_codec.clone(),
        )
    }

    pub fn config(&self) -> &EvidenceConfig {
        &self.config
    }

    pub fn account_codec(&self) -> &AddressCodec {
        &self.account_codec
    }

    pub fn consensus_codec(&self) -> &AddressCodec {
        &self.consensus_codec
    }

    pub fn staking(&self) -> &Arc<K> {
        &self.staking
    }

    pub fn slashing(&self) -> &Arc<L> {
        &self.slashing
    }

    // =========================================================================
    // STORE ACCESS
    // =========================================================================

    pub fn get_evidence(&self, ctx: &Context<'_>, hash: &Hash) -> EvidenceResult<Option<Evidence>> {
        EvidenceStore::new(ctx.kv()).get(hash)
    }

    pub fn has_evidence(&self, ctx: &Context<'_>, hash: &Hash) -> EvidenceResult<bool> {
        EvidenceStore::new(ctx.kv()).has(hash)
    }

    pub fn set_evidence(&self, ctx: &mut Context<'_>, evidence: &Evidence) -> EvidenceResult<()> {
        EvidenceStore::new(ctx.kv_mut()).set(&evidence.hash(), evidence)
    }

    pub fn iterate_evidence<F>(&self, ctx: &Context<'_>, f: F) -> EvidenceResult<()>
    where
        F: FnMut(&Hash, Evidence) -> ControlFlow<()>,
    {
        EvidenceStore::new(ctx.kv()).iterate(f)
    }

    pub fn get_all_evidence(&self, ctx: &Context<'_>) -> EvidenceResult<Vec<Evidence>> {
        EvidenceStore::new(ctx.kv()).all()
    }
}
