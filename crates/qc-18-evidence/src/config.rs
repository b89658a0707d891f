//! Configuration for the Evidence subsystem

use serde::{Deserialize, Serialize};
use shared_types::{AddressCodec, PageLimits};
use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bech32 prefix `{field}` must not be empty")]
    EmptyPrefix { field: &'static str },

    #[error("page limit `{field}` must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("default page limit {default} exceeds maximum {max}")]
    DefaultAboveMax { default: u64, max: u64 },
}

/// Evidence configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    /// Bech32 prefix of account addresses (evidence submitters)
    pub account_prefix: String,
    /// Bech32 prefix of validator consensus addresses
    pub consensus_prefix: String,
    /// Page size used when a query leaves `limit` at zero
    pub default_page_limit: u64,
    /// Hard upper bound on page size
    pub max_page_limit: u64,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            account_prefix: "cosmos".to_string(),
            consensus_prefix: "cosmosvalcons".to_string(),
            default_page_limit: 100,
            max_page_limit: 100,
        }
    }
}

impl EvidenceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, prefix) in [
            ("account_prefix", &self.account_prefix),
            ("consensus_prefix", &self.consensus_prefix),
        ] {
            if prefix.trim().is_empty() {
                return Err(ConfigError::EmptyPrefix { field });
            }
        }
        if self.default_page_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "default_page_limit",
            });
        }
        if self.max_page_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_page_limit",
            });
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::DefaultAboveMax {
                default: self.default_page_limit,
                max: self.max_page_limit,
            });
        }
        Ok(())
    }

    pub fn account_codec(&self) -> AddressCodec {
        AddressCodec::new(&self.account_prefix)
    }

    pub fn consensus_codec(&self) -> AddressCodec {
        AddressCodec::new(&self.consensus_prefix)
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_limit,
            max_limit: self.max_page_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvidenceConfig::default();
        assert_eq!(config.consensus_prefix, "cosmosvalcons");
        assert_eq!(config.max_page_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let config = EvidenceConfig {
            consensus_prefix: " ".into(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyPrefix {
                field: "consensus_prefix"
            })
        );
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let config = EvidenceConfig {
            default_page_limit: 200,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DefaultAboveMax { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EvidenceConfig =
            serde_json::from_str(r#"{"account_prefix":"qc","max_page_limit":50}"#).unwrap();
        assert_eq!(config.account_prefix, "qc");
        assert_eq!(config.max_page_limit, 50);
        assert_eq!(config.consensus_prefix, "cosmosvalcons");
        assert!(config.validate().is_ok());
    }
}
