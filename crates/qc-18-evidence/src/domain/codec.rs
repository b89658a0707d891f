//! # Canonical Evidence Codec
//!
//! ## Equivocation layout
//!
//! ```text
//! height            i64  little-endian
//! time.seconds      i64  little-endian
//! time.nanos        u32  little-endian
//! power             i64  little-endian
//! consensus_address u64  little-endian length, then UTF-8 bytes
//! ```
//!
//! This is the bincode fixint layout of [`EquivocationWire`], so the stored
//! payload decodes with bincode while hashing never needs a fallible
//! serializer.
//!
//! ## Store value
//!
//! Records are wrapped in an [`EvidenceEnvelope`] carrying the kind tag, so
//! new kinds can share the same key space.

use crate::domain::evidence::{Equivocation, Evidence, EvidenceRecord, ROUTE_EQUIVOCATION};
use crate::error::{EvidenceError, EvidenceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire form of an [`Equivocation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivocationWire {
    pub height: i64,
    pub time_seconds: i64,
    pub time_nanos: u32,
    pub power: i64,
    pub consensus_address: String,
}

impl From<&Equivocation> for EquivocationWire {
    fn from(e: &Equivocation) -> Self {
        Self {
            height: e.height,
            time_seconds: e.time.timestamp(),
            time_nanos: e.time.timestamp_subsec_nanos(),
            power: e.power,
            consensus_address: e.consensus_address.clone(),
        }
    }
}

impl TryFrom<EquivocationWire> for Equivocation {
    type Error = EvidenceError;

    fn try_from(wire: EquivocationWire) -> EvidenceResult<Self> {
        let time = DateTime::<Utc>::from_timestamp(wire.time_seconds, wire.time_nanos)
            .ok_or_else(|| {
                EvidenceError::corrupted(format!(
                    "timestamp out of range: {}s {}ns",
                    wire.time_seconds, wire.time_nanos
                ))
            })?;
        Ok(Equivocation {
            height: wire.height,
            time,
            power: wire.power,
            consensus_address: wire.consensus_address,
        })
    }
}

/// Kind-tagged store value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEnvelope {
    pub kind: String,
    pub payload: Vec<u8>,
}

/// Deterministic byte encoding hashed for record identity.
pub fn canonical_bytes(e: &Equivocation) -> Vec<u8> {
    let address = e.consensus_address.as_bytes();
    let mut out = Vec::with_capacity(8 + 8 + 4 + 8 + 8 + address.len());
    out.extend_from_slice(&e.height.to_le_bytes());
    out.extend_from_slice(&e.time.timestamp().to_le_bytes());
    out.extend_from_slice(&e.time.timestamp_subsec_nanos().to_le_bytes());
    out.extend_from_slice(&e.power.to_le_bytes());
    out.extend_from_slice(&(address.len() as u64).to_le_bytes());
    out.extend_from_slice(address);
    out
}

/// Encode a record as a store value.
pub fn encode_evidence(evidence: &Evidence) -> EvidenceResult<Vec<u8>> {
    let payload = match evidence {
        Evidence::Equivocation(e) => canonical_bytes(e),
    };
    let envelope = EvidenceEnvelope {
        kind: evidence.kind().to_string(),
        payload,
    };
    bincode::serialize(&envelope)
        .map_err(|e| EvidenceError::invariant(format!("failed to encode evidence: {e}")))
}

/// Decode a store value. Any failure means the store is corrupted.
pub fn decode_evidence(bytes: &[u8]) -> EvidenceResult<Evidence> {
    let envelope: EvidenceEnvelope = bincode::deserialize(bytes)
        .map_err(|e| EvidenceError::corrupted(format!("undecodable evidence envelope: {e}")))?;

    match envelope.kind.as_str() {
        ROUTE_EQUIVOCATION => {
            let wire: EquivocationWire = bincode::deserialize(&envelope.payload).map_err(|e| {
                EvidenceError::corrupted(format!("undecodable equivocation payload: {e}"))
            })?;
            Ok(Evidence::Equivocation(wire.try_into()?))
        }
        other => Err(EvidenceError::corrupted(format!(
            "unknown evidence kind in store: {other}"
        ))),
    }
}
