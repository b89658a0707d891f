//! # Shared Types Crate
//!
//! Primitives used by every state-machine subsystem of the node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Cross-subsystem value types are defined here.
//! - **Determinism**: Nothing in this crate reads clocks, randomness or
//!   global configuration. Address prefixes travel in an explicit
//!   [`AddressCodec`] rather than a process-wide setting.
//! - **No Floating Point**: Fractions are fixed-point [`Dec`] values.

pub mod address;
pub mod decimal;
pub mod entities;
pub mod errors;
pub mod pagination;

pub use address::{AccAddress, AddressCodec, ConsAddress, ValAddress};
pub use decimal::Dec;
pub use entities::*;
pub use errors::*;
pub use pagination::{paginate, PageLimits, PageRequest, PageResponse};
