//! # Core Entities
//!
//! Hash identity shared by the storage-facing subsystems.

use sha2::{Digest, Sha256};

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// Length in bytes of a [`Hash`].
pub const HASH_LENGTH: usize = 32;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; HASH_LENGTH];

/// SHA-256 over `bytes`, the content hash used for record identity.
pub fn sha256(bytes: &[u8]) -> Hash {
    Sha256::digest(bytes).into()
}

/// Uppercase hex rendering used in events, logs and error messages.
pub fn hash_to_upper_hex(hash: &[u8]) -> String {
    hex::encode_upper(hash)
}
