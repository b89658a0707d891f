//! Domain layer for the Evidence subsystem
//!
//! Pure model: evidence kinds, their canonical codec, the sealed router,
//! consensus reports and protocol constants. No I/O.

pub mod codec;
pub mod evidence;
pub mod misbehavior;
pub mod msgs;
pub mod params;
pub mod router;
pub mod validator;

pub use codec::{canonical_bytes, decode_evidence, encode_evidence, EvidenceEnvelope};
pub use evidence::{Equivocation, Evidence, EvidenceRecord, ROUTE_EQUIVOCATION};
pub use misbehavior::{Misbehavior, MisbehaviorType, MisbehaviorValidator};
pub use msgs::{MsgSubmitEvidence, MsgSubmitEvidenceResponse};
pub use params::{
    double_sign_jail_end_time, ConsensusParams, EvidenceParams, DOUBLE_SIGN_JAIL_END_UNIX,
    VALIDATOR_UPDATE_DELAY,
};
pub use router::{EvidenceHandler, Router, RouterError};
pub use validator::{BondStatus, ConsPubKey, Infraction, Validator};
