//! # Addresses
//!
//! Raw address newtypes and the bech32 codec that renders them.
//!
//! The codec carries its human-readable prefix explicitly, so two subsystems
//! configured for different chains never share hidden global state.

use crate::errors::{AddressError, MAX_ADDRESS_LENGTH};
use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bech32 encoder/decoder bound to a single human-readable prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCodec {
    hrp: String,
}

impl AddressCodec {
    pub fn new(hrp: impl Into<String>) -> Self {
        Self { hrp: hrp.into() }
    }

    /// Human-readable prefix of this codec.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// Encode raw address bytes as bech32.
    pub fn encode(&self, bytes: &[u8]) -> Result<String, AddressError> {
        verify_address_format(bytes)?;
        bech32::encode(&self.hrp, bytes.to_base32(), Variant::Bech32)
            .map_err(|e| AddressError::Bech32(e.to_string()))
    }

    /// Decode a bech32 string, checking that the prefix matches.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, AddressError> {
        if text.trim().is_empty() {
            return Err(AddressError::Empty);
        }

        let (hrp, data, _variant) =
            bech32::decode(text).map_err(|e| AddressError::Bech32(e.to_string()))?;
        if hrp != self.hrp {
            return Err(AddressError::WrongPrefix {
                expected: self.hrp.clone(),
                found: hrp,
            });
        }

        let bytes = Vec::<u8>::from_base32(&data).map_err(|e| AddressError::Bech32(e.to_string()))?;
        verify_address_format(&bytes)?;
        Ok(bytes)
    }
}

fn verify_address_format(bytes: &[u8]) -> Result<(), AddressError> {
    if bytes.is_empty() {
        return Err(AddressError::Empty);
    }
    if bytes.len() > MAX_ADDRESS_LENGTH {
        return Err(AddressError::InvalidLength { len: bytes.len() });
    }
    Ok(())
}

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name(Vec<u8>);

        impl $name {
            pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
                Self(bytes.into())
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Render with the codec's prefix.
            pub fn to_bech32(&self, codec: &AddressCodec) -> Result<String, AddressError> {
                codec.encode(&self.0)
            }

            /// Parse a bech32 string carrying the codec's prefix.
            pub fn from_bech32(codec: &AddressCodec, text: &str) -> Result<Self, AddressError> {
                codec.decode(text).map(Self)
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        /// Uppercase hex, prefix-independent.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode_upper(&self.0))
            }
        }
    };
}

address_type!(
    /// Account address (transaction signers, evidence submitters).
    AccAddress
);

address_type!(
    /// Validator operator address.
    ValAddress
);

address_type!(
    /// Address derived from a validator's consensus public key.
    ConsAddress
);
