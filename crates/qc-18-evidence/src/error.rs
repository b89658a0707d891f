//! Error types for the Evidence subsystem
//!
//! User-path failures carry a stable numeric code inside the `evidence`
//! codespace. Fatal kinds indicate a broken dependency or corrupted state and
//! must halt the enclosing block.

use shared_types::{AddressError, PaginationError};
use thiserror::Error;

/// Codespace shared by every registered error code.
pub const CODESPACE: &str = "evidence";

/// Errors raised by the key-value store port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Evidence subsystem errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceError {
    /// Router has no handler for the evidence kind
    #[error("route {kind}: unregistered handler for evidence type")]
    NoEvidenceHandlerExists { kind: String },

    /// Stateless validation failed or the handler rejected the evidence
    #[error("{reason}: invalid evidence")]
    InvalidEvidence { reason: String },

    /// Query for a hash that is not in the store
    #[error("evidence {hash} not found: evidence does not exist")]
    NoEvidenceExists { hash: String },

    /// Submission of a hash that is already persisted
    #[error("{hash}: evidence already exists")]
    EvidenceExists { hash: String },

    /// Malformed query or message
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Genesis state failed validation
    #[error("invalid genesis state: {reason}")]
    InvalidGenesis { reason: String },

    /// Genesis import found the same hash twice
    #[error("evidence {hash} already exists in genesis state")]
    DuplicateGenesisEvidence { hash: String },

    /// A state-machine precondition does not hold
    #[error("invariant violated: {reason}")]
    Invariant { reason: String },

    /// Persisted record could not be decoded
    #[error("corrupted evidence store: {reason}")]
    Corrupted { reason: String },

    /// Underlying store failure
    #[error("storage error: {0}")]
    Storage(#[from] KVStoreError),

    /// Staking or slashing subsystem failure
    #[error("{subsystem} dependency failed: {reason}")]
    Dependency {
        subsystem: &'static str,
        reason: String,
    },
}

impl EvidenceError {
    /// Registered error code within [`CODESPACE`]. Fatal kinds report 1
    /// (internal).
    pub fn code(&self) -> u32 {
        match self {
            EvidenceError::NoEvidenceHandlerExists { .. } => 2,
            EvidenceError::InvalidEvidence { .. } => 3,
            EvidenceError::NoEvidenceExists { .. } => 4,
            EvidenceError::EvidenceExists { .. } => 5,
            EvidenceError::InvalidRequest { .. } => 6,
            EvidenceError::InvalidGenesis { .. } | EvidenceError::DuplicateGenesisEvidence { .. } => 7,
            EvidenceError::Invariant { .. }
            | EvidenceError::Corrupted { .. }
            | EvidenceError::Storage(_)
            | EvidenceError::Dependency { .. } => 1,
        }
    }

    /// Whether the error must halt block execution instead of being returned
    /// to a transaction sender.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EvidenceError::Invariant { .. }
                | EvidenceError::Corrupted { .. }
                | EvidenceError::Storage(_)
                | EvidenceError::Dependency { .. }
        )
    }

    /// Wrap a handler rejection as [`EvidenceError::InvalidEvidence`],
    /// leaving fatal errors untouched.
    pub fn into_invalid_evidence(self) -> Self {
        match self {
            err if err.is_fatal() => err,
            EvidenceError::InvalidEvidence { reason } => EvidenceError::InvalidEvidence {
                reason: format!("failed to handle evidence: {reason}"),
            },
            other => EvidenceError::InvalidEvidence {
                reason: format!("failed to handle evidence: {other}"),
            },
        }
    }

    pub fn invalid_evidence(reason: impl Into<String>) -> Self {
        EvidenceError::InvalidEvidence {
            reason: reason.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        EvidenceError::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        EvidenceError::Invariant {
            reason: reason.into(),
        }
    }

    pub fn corrupted(reason: impl Into<String>) -> Self {
        EvidenceError::Corrupted {
            reason: reason.into(),
        }
    }

    pub fn dependency(subsystem: &'static str, reason: impl Into<String>) -> Self {
        EvidenceError::Dependency {
            subsystem,
            reason: reason.into(),
        }
    }
}

impl From<PaginationError> for EvidenceError {
    fn from(err: PaginationError) -> Self {
        EvidenceError::invalid_request(err.to_string())
    }
}

impl From<AddressError> for EvidenceError {
    fn from(err: AddressError) -> Self {
        EvidenceError::invalid_request(err.to_string())
    }
}

/// Result type for evidence operations
pub type EvidenceResult<T> = Result<T, EvidenceError>;
