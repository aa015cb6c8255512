//! BIP-322 and legacy BIP-137 message signing and verification for Bitcoin
//! and Liquid addresses.

#![no_std]

#[macro_use]
pub extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod address;
pub mod bip137;
pub mod blech32;
pub mod error;
pub mod signer;
pub mod utils;
pub mod verifier;

pub use address::*;
pub use bip137::*;
pub use blech32::Blech32;
pub use error::*;
pub use signer::*;
pub use utils::*;
pub use verifier::*;
