//! Consensus-level evidence parameters and fixed protocol constants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blocks between a staking change and its effect on the consensus
/// validator set.
pub const VALIDATOR_UPDATE_DELAY: i64 = 1;

/// Unix seconds of 9999-12-31T23:59:59Z, the largest timestamp the wire
/// codec represents.
pub const DOUBLE_SIGN_JAIL_END_UNIX: i64 = 253_402_300_799;

/// Unjail time assigned to a double-signer. Effectively permanent.
pub fn double_sign_jail_end_time() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(DOUBLE_SIGN_JAIL_END_UNIX, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Evidence age limits, read from consensus parameters.
///
/// Evidence is stale only when it is older than *both* budgets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceParams {
    /// Maximum age in blocks
    pub max_age_num_blocks: i64,
    /// Maximum age in wall-clock time
    pub max_age_duration: Duration,
    /// Maximum total evidence bytes per block (enforced by consensus)
    pub max_bytes: i64,
}

impl Default for EvidenceParams {
    fn default() -> Self {
        Self {
            max_age_num_blocks: 100_000,
            max_age_duration: Duration::from_secs(48 * 60 * 60),
            max_bytes: 1_048_576,
        }
    }
}

/// Consensus parameters visible to the evidence module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// `None` disables the age gate.
    pub evidence: Option<EvidenceParams>,
}

impl ConsensusParams {
    pub fn with_evidence(evidence: EvidenceParams) -> Self {
        Self {
            evidence: Some(evidence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jail_end_time_is_year_9999() {
        assert_eq!(
            double_sign_jail_end_time().to_rfc3339(),
            "9999-12-31T23:59:59+00:00"
        );
    }

    #[test]
    fn test_default_evidence_params() {
        let params = EvidenceParams::default();
        assert_eq!(params.max_age_num_blocks, 100_000);
        assert_eq!(params.max_age_duration, Duration::from_secs(172_800));
        assert_eq!(params.max_bytes, 1_048_576);
        assert!(ConsensusParams::default().evidence.is_none());
    }
}
