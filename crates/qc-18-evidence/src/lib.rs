//! # qc-18-evidence
//!
//! Evidence subsystem: turns proof of validator misbehavior into economic
//! punishment with strict determinism and replay safety.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Evidence Model**: Tagged evidence kinds with a content-addressed hash
//! - **Sealed Router**: Kind → handler table, frozen before the first block
//! - **Equivocation Handling**: Age gate, tombstone idempotence, slash + jail + tombstone
//! - **Begin-Block Ingestion**: Consensus misbehavior reports adjudicated in order
//! - **Genesis & Queries**: Deterministic export/import and paginated reads
//!
//! ## Architecture
//!
//! ```text
//!   consensus engine                    user transaction
//!   (misbehavior reports)               (MsgSubmitEvidence)
//!            │                                │
//!            ▼                                ▼
//!      begin_block                     submit_evidence
//!            │                                │
//!            │                          Router (sealed)
//!            │                                │
//!            └──────────────┬─────────────────┘
//!                           ▼
//!                 EquivocationHandler ──→ Staking / Slashing
//!                           │
//!                           ▼
//!                    EvidenceStore ←── Genesis  ──→ Queries
//! ```
//!
//! ## Error Model
//!
//! | Kind | Code | Halts block |
//! |------|------|-------------|
//! | NoEvidenceHandlerExists | 2 | no |
//! | InvalidEvidence | 3 | no |
//! | NoEvidenceExists | 4 | no |
//! | EvidenceExists | 5 | no |
//! | Invariant / Corrupted / Storage / Dependency | 1 | yes |
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_18_evidence::{EvidenceConfig, EvidenceModule, InMemoryKVStore};
//! use qc_18_evidence::ports::inbound::EvidenceApi;
//!
//! let module = EvidenceModule::new(
//!     EvidenceConfig::default(),
//!     InMemoryKVStore::new(),
//!     staking,
//!     slashing,
//! )?;
//!
//! module.begin_block(&block, &misbehavior)?;
//! let result = module.deliver_submit_evidence(&block, &msg)?;
//! ```

pub mod adapters;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod events;
pub mod keeper;
pub mod metrics;
pub mod module;
pub mod ports;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{CacheStore, InMemoryKVStore};
pub use config::{ConfigError, EvidenceConfig};
pub use context::{Context, HeaderInfo};
pub use domain::{
    ConsensusParams, Equivocation, Evidence, EvidenceHandler, EvidenceParams, EvidenceRecord,
    Misbehavior, MisbehaviorType, MsgSubmitEvidence, MsgSubmitEvidenceResponse, Router,
    RouterError,
};
pub use error::{EvidenceError, EvidenceResult, KVStoreError};
pub use events::{Event, EventManager};
pub use keeper::{EquivocationHandler, EquivocationOutcome, EvidenceKeeper, GenesisState};
pub use module::EvidenceModule;
pub use store::EvidenceStore;
