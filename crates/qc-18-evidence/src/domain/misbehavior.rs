//! Byzantine-validator reports handed over by the consensus engine at the
//! start of each block.

use crate::domain::evidence::Equivocation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{AddressCodec, AddressError};

/// Consensus misbehavior type. Unrecognised codes are preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MisbehaviorType {
    DuplicateVote,
    LightClientAttack,
    Unknown(i32),
}

impl MisbehaviorType {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => MisbehaviorType::DuplicateVote,
            2 => MisbehaviorType::LightClientAttack,
            other => MisbehaviorType::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            MisbehaviorType::DuplicateVote => 1,
            MisbehaviorType::LightClientAttack => 2,
            MisbehaviorType::Unknown(code) => *code,
        }
    }

    /// Metric/log label.
    pub fn label(&self) -> &'static str {
        match self {
            MisbehaviorType::DuplicateVote => "duplicate_vote",
            MisbehaviorType::LightClientAttack => "light_client_attack",
            MisbehaviorType::Unknown(_) => "unknown",
        }
    }
}

/// Offending validator as seen by consensus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisbehaviorValidator {
    /// Raw consensus address bytes
    pub address: Vec<u8>,
    pub power: i64,
}

/// One report of byzantine behavior.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misbehavior {
    pub kind: MisbehaviorType,
    pub validator: MisbehaviorValidator,
    pub height: i64,
    pub time: DateTime<Utc>,
    pub total_voting_power: i64,
}

impl Misbehavior {
    /// Both accepted types map to the same equivocation record.
    pub fn to_equivocation(&self, consensus_codec: &AddressCodec) -> Result<Equivocation, AddressError> {
        let address = consensus_codec.encode(&self.validator.address)?;
        Ok(Equivocation::new(
            self.height,
            self.time,
            self.validator.power,
            address,
        ))
    }
}
