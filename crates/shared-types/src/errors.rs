//! # Error Types
//!
//! Errors raised by the shared primitives.

use thiserror::Error;

/// Maximum length of a raw address accepted by [`crate::AddressCodec`].
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Errors produced while encoding or decoding bech32 addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The address string or byte slice is empty.
    #[error("empty address string is not allowed")]
    Empty,

    /// Human-readable prefix does not match the codec.
    #[error("invalid bech32 prefix: expected {expected}, got {found}")]
    WrongPrefix { expected: String, found: String },

    /// Raw address length outside the accepted range.
    #[error("address length {len} exceeds maximum of {MAX_ADDRESS_LENGTH} bytes")]
    InvalidLength { len: usize },

    /// Underlying bech32 failure (checksum, charset, mixed case...).
    #[error("decoding bech32 failed: {0}")]
    Bech32(String),
}

/// Errors produced by fixed-point decimal parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecError {
    /// The input string is not a non-negative decimal number.
    #[error("invalid decimal string: {0:?}")]
    InvalidFormat(String),

    /// More fractional digits than the fixed precision supports.
    #[error("decimal {input:?} has more than {max} fractional digits")]
    TooPrecise { input: String, max: u32 },

    /// Arithmetic left the representable range.
    #[error("decimal arithmetic overflow")]
    Overflow,
}

/// Errors produced by cursor pagination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Both `key` and `offset` were set on the same request.
    #[error("invalid request, either offset or key is expected, got both")]
    KeyAndOffset,
}
