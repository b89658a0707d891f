//! Validator view consumed from the staking subsystem.

use serde::{Deserialize, Serialize};
use shared_types::{ConsAddress, ValAddress, U256};

/// Bonding state of a validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

/// Snapshot of a validator as returned by the staking keeper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator: ValAddress,
    pub consensus_address: ConsAddress,
    pub status: BondStatus,
    pub jailed: bool,
    pub tokens: U256,
}

impl Validator {
    pub fn is_unbonded(&self) -> bool {
        self.status == BondStatus::Unbonded
    }

    pub fn is_jailed(&self) -> bool {
        self.jailed
    }

    pub fn operator(&self) -> &ValAddress {
        &self.operator
    }
}

/// Reason passed to the slashing subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Infraction {
    Unspecified,
    DoubleSign,
    Downtime,
}

/// Consensus public key bytes returned by the slashing subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsPubKey(pub Vec<u8>);
