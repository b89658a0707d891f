//! # Test Utilities
//!
//! In-memory staking and slashing subsystems for unit and integration tests.
//! Exported behind the `test-utils` feature.

use crate::context::{Context, HeaderInfo};
use crate::domain::{
    BondStatus, ConsPubKey, ConsensusParams, Equivocation, Infraction, Validator,
};
use crate::error::{EvidenceError, EvidenceResult};
use crate::ports::inbound::BlockInfo;
use crate::ports::outbound::{SlashingKeeper, StakingKeeper};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_types::{AddressCodec, ConsAddress, Dec, ValAddress, U256};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tokens per unit of consensus power.
pub const POWER_REDUCTION: u64 = 1_000_000;

pub fn tokens_from_power(power: i64) -> U256 {
    U256::from(power.max(0) as u64) * U256::from(POWER_REDUCTION)
}

/// Consensus address made of `byte` repeated 20 times.
pub fn cons_address(byte: u8) -> ConsAddress {
    ConsAddress::new(vec![byte; 20])
}

pub fn cons_codec() -> AddressCodec {
    AddressCodec::new("cosmosvalcons")
}

/// Bech32 form of [`cons_address`] with the default consensus prefix.
pub fn cons_bech32(byte: u8) -> String {
    cons_address(byte)
        .to_bech32(&cons_codec())
        .expect("20-byte address encodes")
}

/// Bech32 account address with the default account prefix.
pub fn account_bech32(byte: u8) -> String {
    AddressCodec::new("cosmos")
        .encode(&[byte; 20])
        .expect("20-byte address encodes")
}

pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).expect("timestamp in range")
}

pub fn block_info(height: i64, time: DateTime<Utc>, consensus_params: ConsensusParams) -> BlockInfo {
    BlockInfo {
        header: HeaderInfo {
            height,
            time,
            chain_id: "qc-test".to_string(),
        },
        consensus_params,
    }
}

pub fn equivocation(height: i64, time: DateTime<Utc>, power: i64, byte: u8) -> Equivocation {
    Equivocation::new(height, time, power, cons_bech32(byte))
}

// =============================================================================
// STAKING
// =============================================================================

#[derive(Default)]
pub struct MockStakingKeeper {
    validators: RwLock<BTreeMap<ConsAddress, Validator>>,
    /// Rotated-away consensus address → current one
    rotations: RwLock<BTreeMap<ConsAddress, ConsAddress>>,
    fail_lookups: RwLock<bool>,
}

impl MockStakingKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_validator(&self, validator: Validator) {
        self.validators
            .write()
            .insert(validator.consensus_address.clone(), validator);
    }

    pub fn validator(&self, addr: &ConsAddress) -> Option<Validator> {
        self.validators.read().get(addr).cloned()
    }

    pub fn set_status(&self, addr: &ConsAddress, status: BondStatus) {
        if let Some(v) = self.validators.write().get_mut(addr) {
            v.status = status;
        }
    }

    pub fn set_jailed(&self, addr: &ConsAddress, jailed: bool) {
        if let Some(v) = self.validators.write().get_mut(addr) {
            v.jailed = jailed;
        }
    }

    pub fn rotate_key(&self, old: ConsAddress, current: ConsAddress) {
        self.rotations.write().insert(old, current);
    }

    /// Make `validator_by_cons_addr` return an error.
    pub fn fail_lookups(&self, fail: bool) {
        *self.fail_lookups.write() = fail;
    }

    fn burn(&self, addr: &ConsAddress, amount: U256) -> Option<U256> {
        let mut validators = self.validators.write();
        let v = validators.get_mut(addr)?;
        let burned = amount.min(v.tokens);
        v.tokens -= burned;
        Some(burned)
    }
}

impl StakingKeeper for MockStakingKeeper {
    fn validator_by_cons_addr(
        &self,
        _ctx: &Context<'_>,
        addr: &ConsAddress,
    ) -> EvidenceResult<Option<Validator>> {
        if *self.fail_lookups.read() {
            return Err(EvidenceError::dependency("staking", "lookup failed"));
        }
        Ok(self.validator(addr))
    }

    fn validator_identifier(
        &self,
        _ctx: &Context<'_>,
        addr: &ConsAddress,
    ) -> EvidenceResult<ConsAddress> {
        Ok(self
            .rotations
            .read()
            .get(addr)
            .cloned()
            .unwrap_or_else(|| addr.clone()))
    }
}

// =============================================================================
// SLASHING
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SigningInfo {
    pub tombstoned: bool,
    pub jailed_until: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashRecord {
    pub address: ConsAddress,
    pub fraction: Dec,
    pub power: i64,
    pub distribution_height: i64,
    pub infraction: Infraction,
    pub burned: U256,
}

pub struct MockSlashingKeeper {
    staking: Arc<MockStakingKeeper>,
    pubkeys: RwLock<BTreeMap<ConsAddress, ConsPubKey>>,
    signing_infos: RwLock<BTreeMap<ConsAddress, SigningInfo>>,
    slash_fraction: RwLock<Dec>,
    slashes: RwLock<Vec<SlashRecord>>,
    jail_calls: RwLock<usize>,
    fail_slashing: RwLock<bool>,
}

impl MockSlashingKeeper {
    /// Slash fraction defaults to 5%.
    pub fn new(staking: Arc<MockStakingKeeper>) -> Self {
        Self {
            staking,
            pubkeys: RwLock::new(BTreeMap::new()),
            signing_infos: RwLock::new(BTreeMap::new()),
            slash_fraction: RwLock::new(Dec::new_with_prec(5, 2).unwrap_or_default()),
            slashes: RwLock::new(Vec::new()),
            jail_calls: RwLock::new(0),
            fail_slashing: RwLock::new(false),
        }
    }

    pub fn set_pubkey(&self, addr: ConsAddress, key: ConsPubKey) {
        self.pubkeys.write().insert(addr, key);
    }

    pub fn remove_pubkey(&self, addr: &ConsAddress) {
        self.pubkeys.write().remove(addr);
    }

    pub fn add_signing_info(&self, addr: ConsAddress) {
        self.signing_infos.write().entry(addr).or_default();
    }

    pub fn remove_signing_info(&self, addr: &ConsAddress) {
        self.signing_infos.write().remove(addr);
    }

    pub fn signing_info(&self, addr: &ConsAddress) -> Option<SigningInfo> {
        self.signing_infos.read().get(addr).cloned()
    }

    pub fn set_slash_fraction(&self, fraction: Dec) {
        *self.slash_fraction.write() = fraction;
    }

    pub fn slashes(&self) -> Vec<SlashRecord> {
        self.slashes.read().clone()
    }

    /// Number of `jail` calls so far.
    pub fn jail_calls(&self) -> usize {
        *self.jail_calls.read()
    }

    /// Make `slash_with_infraction_reason` fail.
    pub fn fail_slashing(&self, fail: bool) {
        *self.fail_slashing.write() = fail;
    }
}

impl SlashingKeeper for MockSlashingKeeper {
    fn get_pubkey(&self, _ctx: &Context<'_>, addr: &ConsAddress) -> EvidenceResult<ConsPubKey> {
        self.pubkeys
            .read()
            .get(addr)
            .cloned()
            .ok_or_else(|| EvidenceError::dependency("slashing", format!("address {addr} not found")))
    }

    fn is_tombstoned(&self, _ctx: &Context<'_>, addr: &ConsAddress) -> bool {
        self.signing_infos
            .read()
            .get(addr)
            .map(|info| info.tombstoned)
            .unwrap_or(false)
    }

    fn has_validator_signing_info(&self, _ctx: &Context<'_>, addr: &ConsAddress) -> bool {
        self.signing_infos.read().contains_key(addr)
    }

    fn tombstone(&self, _ctx: &Context<'_>, addr: &ConsAddress) -> EvidenceResult<()> {
        match self.signing_infos.write().get_mut(addr) {
            Some(info) => {
                info.tombstoned = true;
                Ok(())
            }
            None => Err(EvidenceError::dependency("slashing", "no signing info to tombstone")),
        }
    }

    fn jail(&self, _ctx: &Context<'_>, addr: &ConsAddress) -> EvidenceResult<()> {
        *self.jail_calls.write() += 1;
        self.staking.set_jailed(addr, true);
        Ok(())
    }

    fn jail_until(
        &self,
        _ctx: &Context<'_>,
        addr: &ConsAddress,
        until: DateTime<Utc>,
    ) -> EvidenceResult<()> {
        match self.signing_infos.write().get_mut(addr) {
            Some(info) => {
                info.jailed_until = Some(until);
                Ok(())
            }
            None => Err(EvidenceError::dependency("slashing", "no signing info to jail")),
        }
    }

    fn slash_with_infraction_reason(
        &self,
        _ctx: &Context<'_>,
        addr: &ConsAddress,
        fraction: Dec,
        power: i64,
        distribution_height: i64,
        infraction: Infraction,
    ) -> EvidenceResult<()> {
        if *self.fail_slashing.read() {
            return Err(EvidenceError::dependency("slashing", "slash failed"));
        }
        let amount = fraction
            .mul_truncate(tokens_from_power(power))
            .map_err(|e| EvidenceError::dependency("slashing", e.to_string()))?;
        let burned = self.staking.burn(addr, amount).unwrap_or_default();
        self.slashes.write().push(SlashRecord {
            address: addr.clone(),
            fraction,
            power,
            distribution_height,
            infraction,
            burned,
        });
        Ok(())
    }

    fn slash_fraction_double_sign(&self, _ctx: &Context<'_>) -> EvidenceResult<Dec> {
        Ok(*self.slash_fraction.read())
    }
}

/// Staking and slashing fakes sharing one validator set.
pub struct MockKeepers {
    pub staking: Arc<MockStakingKeeper>,
    pub slashing: Arc<MockSlashingKeeper>,
}

impl MockKeepers {
    pub fn new() -> Self {
        let staking = Arc::new(MockStakingKeeper::new());
        let slashing = Arc::new(MockSlashingKeeper::new(Arc::clone(&staking)));
        Self { staking, slashing }
    }

    /// Register a bonded, unjailed validator with a pubkey and signing info.
    pub fn add_bonded_validator(&self, byte: u8, power: i64) -> ConsAddress {
        let addr = cons_address(byte);
        self.staking.add_validator(Validator {
            operator: ValAddress::new(vec![byte; 20]),
            consensus_address: addr.clone(),
            status: BondStatus::Bonded,
            jailed: false,
            tokens: tokens_from_power(power),
        });
        self.slashing
            .set_pubkey(addr.clone(), ConsPubKey(vec![byte; 32]));
        self.slashing.add_signing_info(addr.clone());
        addr
    }

    pub fn tokens(&self, addr: &ConsAddress) -> U256 {
        self.staking
            .validator(addr)
            .map(|v| v.tokens)
            .unwrap_or_default()
    }
}

impl Default for MockKeepers {
    fn default() -> Self {
        Self::new()
    }
}
