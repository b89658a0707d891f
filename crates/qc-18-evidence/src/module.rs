//! # Evidence Module
//!
//! Wires the keeper to a committed store and runs each state transition in
//! its own branch:
//!
//! ```text
//! committed store ──branch──→ CacheStore ──Context──→ keeper
//!        ↑                                              │
//!        └──── atomic_batch_write (success only) ───────┘
//! ```
//!
//! The branch is read under an upgradable lock so queries keep reading the
//! committed state until the batch is applied. A failed transition drops the
//! branch together with its events.

use crate::adapters::CacheStore;
use crate::config::{ConfigError, EvidenceConfig};
use crate::context::Context;
use crate::domain::{Misbehavior, MsgSubmitEvidence, MsgSubmitEvidenceResponse, Router, ROUTE_EQUIVOCATION};
use crate::error::EvidenceResult;
use crate::events::Event;
use crate::keeper::{EquivocationOutcome, EvidenceKeeper, GenesisState};
use crate::ports::inbound::{
    BeginBlockResult, BlockInfo, DeliverResult, EvidenceApi, EvidenceQueryApi,
    QueryAllEvidenceRequest, QueryAllEvidenceResponse, QueryEvidenceRequest,
    QueryEvidenceResponse,
};
use crate::ports::outbound::{KeyValueStore, SlashingKeeper, StakingKeeper};
use crate::store::EvidenceStore;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::sync::Arc;
use tracing::{error, info};

pub struct EvidenceModule<S, K, L> {
    keeper: EvidenceKeeper<K, L>,
    store: Arc<RwLock<S>>,
}

impl<S, K, L> EvidenceModule<S, K, L>
where
    S: KeyValueStore,
    K: StakingKeeper + 'static,
    L: SlashingKeeper + 'static,
{
    /// Module with the equivocation route registered and sealed.
    pub fn new(
        config: EvidenceConfig,
        store: S,
        staking: Arc<K>,
        slashing: Arc<L>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut keeper = EvidenceKeeper::new(config, staking, slashing);

        let mut router = Router::new();
        router.add_route(ROUTE_EQUIVOCATION, Arc::new(keeper.equivocation_handler()));
        keeper.set_router(router);

        Ok(Self::from_keeper(keeper, store))
    }

    /// Module with a caller-built router. The router is sealed on install.
    pub fn with_router(
        config: EvidenceConfig,
        store: S,
        staking: Arc<K>,
        slashing: Arc<L>,
        build_router: impl FnOnce(&EvidenceKeeper<K, L>, &mut Router),
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut keeper = EvidenceKeeper::new(config, staking, slashing);

        let mut router = Router::new();
        build_router(&keeper, &mut router);
        keeper.set_router(router);

        Ok(Self::from_keeper(keeper, store))
    }

    fn from_keeper(keeper: EvidenceKeeper<K, L>, store: S) -> Self {
        info!(
            "[qc-18] Evidence module ready (routes: {:?})",
            keeper.router().map(|r| r.kinds().collect::<Vec<_>>()).unwrap_or_default()
        );
        Self {
            keeper,
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn keeper(&self) -> &EvidenceKeeper<K, L> {
        &self.keeper
    }

    /// Shared handle to the committed store.
    pub fn store(&self) -> Arc<RwLock<S>> {
        Arc::clone(&self.store)
    }

    /// Run `f` in a branch of the committed store; commit on success.
    fn execute<T, F>(&self, block: &BlockInfo, f: F) -> EvidenceResult<(T, Vec<Event>)>
    where
        F: FnOnce(&EvidenceKeeper<K, L>, &mut Context<'_>) -> EvidenceResult<T>,
    {
        let committed = self.store.upgradable_read();

        let (value, batch, events) = {
            let mut branch = CacheStore::new(&*committed);
            let mut ctx = Context::new(
                block.header.clone(),
                block.consensus_params.clone(),
                &mut branch,
            );
            let value = f(&self.keeper, &mut ctx)?;
            let events = ctx.into_events();
            (value, branch.into_batch(), events)
        };

        if !batch.is_empty() {
            let mut committed = RwLockUpgradableReadGuard::upgrade(committed);
            committed.atomic_batch_write(batch)?;
        }
        Ok((value, events))
    }
}

impl<S, K, L> EvidenceApi for EvidenceModule<S, K, L>
where
    S: KeyValueStore,
    K: StakingKeeper + 'static,
    L: SlashingKeeper + 'static,
{
    fn init_genesis(&self, block: &BlockInfo, genesis: &GenesisState) -> EvidenceResult<()> {
        self.execute(block, |keeper, ctx| keeper.init_genesis(ctx, genesis))
            .map(|_| ())
    }

    fn export_genesis(&self) -> EvidenceResult<GenesisState> {
        let committed = self.store.read();
        Ok(GenesisState::new(EvidenceStore::new(&*committed).all()?))
    }

    fn begin_block(
        &self,
        block: &BlockInfo,
        misbehavior: &[Misbehavior],
    ) -> EvidenceResult<BeginBlockResult> {
        let result = self.execute(block, |keeper, ctx| keeper.begin_block(ctx, misbehavior));
        match result {
            Ok((outcomes, events)) => {
                let punished = outcomes
                    .iter()
                    .filter(|o| matches!(o, EquivocationOutcome::Punished { .. }))
                    .count();
                if punished > 0 {
                    info!(
                        "[qc-18] Block #{}: punished {} of {} reported validators",
                        block.header.height,
                        punished,
                        misbehavior.len()
                    );
                }
                Ok(BeginBlockResult { outcomes, events })
            }
            Err(err) => {
                error!(
                    "[qc-18] Begin-block failed at height {}: {}",
                    block.header.height, err
                );
                Err(err)
            }
        }
    }

    fn deliver_submit_evidence(
        &self,
        block: &BlockInfo,
        msg: &MsgSubmitEvidence,
    ) -> EvidenceResult<DeliverResult<MsgSubmitEvidenceResponse>> {
        let (response, events) =
            self.execute(block, |keeper, ctx| keeper.handle_submit_evidence(ctx, msg))?;
        Ok(DeliverResult { response, events })
    }
}

impl<S, K, L> EvidenceQueryApi for EvidenceModule<S, K, L>
where
    S: KeyValueStore,
    K: StakingKeeper + 'static,
    L: SlashingKeeper + 'static,
{
    fn evidence(&self, request: &QueryEvidenceRequest) -> EvidenceResult<QueryEvidenceResponse> {
        let committed = self.store.read();
        self.keeper.query_evidence(&*committed, request)
    }

    fn all_evidence(
        &self,
        request: &QueryAllEvidenceRequest,
    ) -> EvidenceResult<QueryAllEvidenceResponse> {
        let committed = self.store.read();
        self.keeper.query_all_evidence(&*committed, request)
    }
}
