//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the Evidence subsystem. The host wires real
//! staking, slashing and storage implementations; tests use the in-memory
//! fakes in `test_utils`.

use crate::context::Context;
use crate::domain::{ConsPubKey, Infraction, Validator};
use crate::error::{EvidenceResult, KVStoreError};
use chrono::{DateTime, Utc};
use shared_types::{ConsAddress, Dec};

/// Read half of a key-value store.
pub trait KvReader: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// All entries under `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// Abstract interface for key-value database operations.
///
/// Production: the node's persistent store.
/// Testing: `InMemoryKVStore` (adapters/memory.rs)
pub trait KeyValueStore: KvReader {
    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

impl<T: KvReader + ?Sized> KvReader for &T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        (**self).prefix_scan(prefix)
    }
}

impl<T: KvReader + ?Sized> KvReader for &mut T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        (**self).prefix_scan(prefix)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        (**self).delete(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }
}

/// Staking subsystem, as seen by the evidence module.
pub trait StakingKeeper: Send + Sync {
    /// Validator currently registered under `addr`, if any.
    fn validator_by_cons_addr(
        &self,
        ctx: &Context<'_>,
        addr: &ConsAddress,
    ) -> EvidenceResult<Option<Validator>>;

    /// Map a (possibly rotated-away) consensus address to the one the
    /// slashing subsystem tracks. Identity when no key rotation happened.
    fn validator_identifier(
        &self,
        _ctx: &Context<'_>,
        addr: &ConsAddress,
    ) -> EvidenceResult<ConsAddress> {
        Ok(addr.clone())
    }
}

/// Slashing subsystem, as seen by the evidence module.
pub trait SlashingKeeper: Send + Sync {
    /// Consensus public key registered for `addr`. An error means the
    /// validator is unknown to the chain.
    fn get_pubkey(&self, ctx: &Context<'_>, addr: &ConsAddress) -> EvidenceResult<ConsPubKey>;

    fn is_tombstoned(&self, ctx: &Context<'_>, addr: &ConsAddress) -> bool;

    fn has_validator_signing_info(&self, ctx: &Context<'_>, addr: &ConsAddress) -> bool;

    fn tombstone(&self, ctx: &Context<'_>, addr: &ConsAddress) -> EvidenceResult<()>;

    fn jail(&self, ctx: &Context<'_>, addr: &ConsAddress) -> EvidenceResult<()>;

    fn jail_until(
        &self,
        ctx: &Context<'_>,
        addr: &ConsAddress,
        until: DateTime<Utc>,
    ) -> EvidenceResult<()>;

    /// Burn `fraction` of the stake the validator held at
    /// `distribution_height`. Rounding is owned by the staking layer.
    fn slash_with_infraction_reason(
        &self,
        ctx: &Context<'_>,
        addr: &ConsAddress,
        fraction: Dec,
        power: i64,
        distribution_height: i64,
        infraction: Infraction,
    ) -> EvidenceResult<()>;

    fn slash_fraction_double_sign(&self, ctx: &Context<'_>) -> EvidenceResult<Dec>;
}
