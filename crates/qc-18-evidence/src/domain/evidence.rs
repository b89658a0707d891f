//! # Evidence Model
//!
//! Evidence is a tagged variant over the misbehavior kinds the chain can
//! adjudicate. Each record is identified by the SHA-256 of its canonical
//! encoding (see [`crate::domain::codec`]).

use crate::domain::codec;
use crate::error::{EvidenceError, EvidenceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{hash_to_upper_hex, sha256, AddressCodec, AddressError, ConsAddress, Hash};
use std::fmt;

/// Route under which equivocation evidence is handled.
pub const ROUTE_EQUIVOCATION: &str = "equivocation";

/// Capabilities every evidence kind exposes.
pub trait EvidenceRecord {
    /// Router key for this kind.
    fn kind(&self) -> &'static str;

    /// Content hash of the canonical encoding.
    fn hash(&self) -> Hash;

    /// Stateless field checks.
    fn validate_basic(&self) -> EvidenceResult<()>;

    /// Height at which the infraction occurred.
    fn height(&self) -> i64;
}

/// Double-signing by a validator at a given height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equivocation {
    pub height: i64,
    pub time: DateTime<Utc>,
    pub power: i64,
    /// Bech32 consensus address of the offending validator
    pub consensus_address: String,
}

impl Equivocation {
    pub fn new(
        height: i64,
        time: DateTime<Utc>,
        power: i64,
        consensus_address: impl Into<String>,
    ) -> Self {
        Self {
            height,
            time,
            power,
            consensus_address: consensus_address.into(),
        }
    }

    /// Decode the consensus address with the chain's consensus prefix.
    pub fn consensus_address(&self, codec: &AddressCodec) -> Result<ConsAddress, AddressError> {
        ConsAddress::from_bech32(codec, &self.consensus_address)
    }

    pub fn validator_power(&self) -> i64 {
        self.power
    }

    /// Not tracked for equivocation.
    pub fn total_power(&self) -> i64 {
        0
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }
}

impl EvidenceRecord for Equivocation {
    fn kind(&self) -> &'static str {
        ROUTE_EQUIVOCATION
    }

    fn hash(&self) -> Hash {
        sha256(&codec::canonical_bytes(self))
    }

    fn validate_basic(&self) -> EvidenceResult<()> {
        if self.time.timestamp() <= 0 {
            return Err(EvidenceError::invalid_evidence(format!(
                "invalid equivocation time: {}",
                self.time.to_rfc3339()
            )));
        }
        if self.height < 1 {
            return Err(EvidenceError::invalid_evidence(format!(
                "invalid equivocation height: {}",
                self.height
            )));
        }
        if self.power < 1 {
            return Err(EvidenceError::invalid_evidence(format!(
                "invalid equivocation validator power: {}",
                self.power
            )));
        }
        if self.consensus_address.is_empty() {
            return Err(EvidenceError::invalid_evidence(
                "invalid equivocation validator consensus address: empty",
            ));
        }
        Ok(())
    }

    fn height(&self) -> i64 {
        self.height
    }
}

impl fmt::Display for Equivocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "equivocation {{ height: {}, time: {}, power: {}, consensus_address: {} }}",
            self.height,
            self.time.to_rfc3339(),
            self.power,
            self.consensus_address
        )
    }
}

/// Evidence record, tagged by kind on the wire and in genesis JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "snake_case")]
pub enum Evidence {
    Equivocation(Equivocation),
}

impl Evidence {
    pub fn as_equivocation(&self) -> Option<&Equivocation> {
        match self {
            Evidence::Equivocation(e) => Some(e),
        }
    }

    /// Uppercase hex of [`EvidenceRecord::hash`].
    pub fn hash_hex(&self) -> String {
        hash_to_upper_hex(&self.hash())
    }
}

impl EvidenceRecord for Evidence {
    fn kind(&self) -> &'static str {
        match self {
            Evidence::Equivocation(e) => e.kind(),
        }
    }

    fn hash(&self) -> Hash {
        match self {
            Evidence::Equivocation(e) => e.hash(),
        }
    }

    fn validate_basic(&self) -> EvidenceResult<()> {
        match self {
            Evidence::Equivocation(e) => e.validate_basic(),
        }
    }

    fn height(&self) -> i64 {
        match self {
            Evidence::Equivocation(e) => e.height(),
        }
    }
}

impl From<Equivocation> for Evidence {
    fn from(e: Equivocation) -> Self {
        Evidence::Equivocation(e)
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Equivocation(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "cosmosvalcons1qyqszqgpqyqszqgpqyqszqgpqyqszqgpr5xhdw";

    fn sample() -> Equivocation {
        Equivocation::new(
            5,
            DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap(),
            100,
            ADDR,
        )
    }

    #[test]
    fn test_valid_equivocation_passes() {
        assert!(sample().validate_basic().is_ok());
    }

    #[test]
    fn test_validate_basic_rejections() {
        let mut e = sample();
        e.height = 0;
        assert_eq!(e.validate_basic().unwrap_err().code(), 3);

        let mut e = sample();
        e.power = 0;
        assert!(e.validate_basic().is_err());

        let mut e = sample();
        e.time = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        assert!(e.validate_basic().is_err());

        let mut e = sample();
        e.consensus_address.clear();
        assert!(e.validate_basic().is_err());
    }

    #[test]
    fn test_hash_is_field_sensitive() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.hash(), b.hash());
        b.height += 1;
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_accessors() {
        let e = sample();
        let codec = AddressCodec::new("cosmosvalcons");
        assert_eq!(e.consensus_address(&codec).unwrap().as_bytes(), &[1u8; 20]);
        assert_eq!(e.validator_power(), 100);
        assert_eq!(e.total_power(), 0);
        assert_eq!(Evidence::from(e).kind(), ROUTE_EQUIVOCATION);
    }

    #[test]
    fn test_json_is_tagged() {
        let evidence = Evidence::from(sample());
        let json = serde_json::to_value(&evidence).unwrap();
        assert_eq!(json["@type"], "equivocation");
        assert_eq!(json["height"], 5);
        let back: Evidence = serde_json::from_value(json).unwrap();
        assert_eq!(back, evidence);
    }
}
