//! Error types for BIP-322 and BIP-137 operations.

use alloc::string::{String, ToString};
use core::fmt;

use bitcoin::{base58, base64, consensus, key, secp256k1};

use crate::AddressType;

/// Error types for message signing and verification operations.
///
/// Semantically wrong but well-formed input (wrong message, wrong signature,
/// wrong address) is never reported here: verification answers `false` for
/// those. The variants below cover malformed or unsupported input.
#[derive(Debug)]
pub enum Error {
    /// The private key does not derive the address it is asked to sign for
    KeyAddressMismatch(String),
    /// The address type is recognised but signing for it is not supported
    UnsupportedAddressType,
    /// The witness stack does not belong to a supported address type
    UnsupportedAddress,
    /// The address matches no known address pattern
    UnknownAddressType,
    /// A public key cannot be turned into the requested address type
    UnsupportedKeyDerivation(AddressType),
    /// The `to_sign` input carries no finalized witness to encode
    EmptyWitness,
    /// Error encountered when extracting data, such as from a PSBT
    ExtractionError(String),
    /// The provided private key is invalid, or belongs to another network
    InvalidPrivateKey,
    /// The provided public key is invalid
    InvalidPublicKey(String),
    /// The address failed to decode
    InvalidAddress(String),
    /// Unable to compute the signature hash for signing
    SighashError,
    /// Error encountered when decoding Base64 data
    Base64DecodeError,
    /// The digital signature is invalid
    InvalidSignature(String),
    /// Error encountered when decoding Bitcoin consensus data
    DecodeError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::KeyAddressMismatch(address) => write!(
                f,
                "Invalid private key provided for signing message for {}.",
                address
            ),
            Self::UnsupportedAddressType => write!(
                f,
                "Unable to sign BIP-322 message for unsupported address type."
            ),
            Self::UnsupportedAddress => write!(f, "Unsupported address is provided."),
            Self::UnknownAddressType => write!(f, "Unknown address type"),
            Self::UnsupportedKeyDerivation(address_type) => write!(
                f,
                "Cannot convert public key into unsupported address type {:?}.",
                address_type
            ),
            Self::EmptyWitness => write!(f, "Cannot encode empty witness stack."),
            Self::ExtractionError(e) => write!(f, "Unable to extract {}", e),
            Self::InvalidPrivateKey => write!(f, "Invalid private key"),
            Self::InvalidPublicKey(e) => write!(f, "Invalid public key {}", e),
            Self::InvalidAddress(e) => write!(f, "Invalid address - {}", e),
            Self::SighashError => write!(f, "Unable to compute signature hash"),
            Self::Base64DecodeError => write!(f, "Base64 decoding failed"),
            Self::InvalidSignature(e) => write!(f, "Invalid Signature - {}", e),
            Self::DecodeError(e) => write!(f, "Consensus decode error - {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<base58::Error> for Error {
    fn from(e: base58::Error) -> Self {
        Self::InvalidAddress(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(_: base64::DecodeError) -> Self {
        Self::Base64DecodeError
    }
}

impl From<consensus::encode::Error> for Error {
    fn from(e: consensus::encode::Error) -> Self {
        Self::DecodeError(e.to_string())
    }
}

impl From<key::FromSliceError> for Error {
    fn from(e: key::FromSliceError) -> Self {
        Self::InvalidPublicKey(e.to_string())
    }
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Self::InvalidSignature(e.to_string())
    }
}
