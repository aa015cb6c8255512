//! Legacy BIP-137 message signatures.
//!
//! A BIP-137 signature is 65 bytes: a header byte followed by the compact
//! (r, s) pair. The header carries the recovery id and announces the script
//! type the signer had in mind:
//!
//! | header   | key          | script      |
//! |----------|--------------|-------------|
//! | 27 - 30  | uncompressed | P2PKH       |
//! | 31 - 34  | compressed   | P2PKH       |
//! | 35 - 38  | compressed   | P2SH-P2WPKH |
//! | 39 - 42  | compressed   | P2WPKH      |

use alloc::string::{String, ToString};

use bitcoin::{
    base64::{prelude::BASE64_STANDARD, Engine},
    hashes::Hash,
    secp256k1::{
        ecdsa::{RecoverableSignature, RecoveryId},
        Message,
    },
    sign_message::{signed_msg_hash, MessageSignature},
    PrivateKey, PublicKey,
};
use log::debug;

use crate::{Address, Error, Payload, SecpCtx};

const SIGNATURE_LENGTH: usize = 65;
const HEADER_MIN: u8 = 27;
const HEADER_MAX: u8 = 42;

/// Script type announced by a BIP-137 header byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderKind {
    P2pkhUncompressed,
    P2pkhCompressed,
    P2shP2wpkh,
    P2wpkh,
}

/// A decoded BIP-137 signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bip137Signature {
    /// The recoverable signature and key compression flag
    pub signature: MessageSignature,
    /// Script type announced by the header
    pub kind: HeaderKind,
}

impl Bip137Signature {
    /// Decodes the 65-byte wire form.
    ///
    /// Only the compression flag and recovery id are taken from the header;
    /// the announced script type is kept for information.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(Error::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            )));
        }

        let header = bytes[0];
        let kind = match header {
            27..=30 => HeaderKind::P2pkhUncompressed,
            31..=34 => HeaderKind::P2pkhCompressed,
            35..=38 => HeaderKind::P2shP2wpkh,
            39..=42 => HeaderKind::P2wpkh,
            _ => {
                return Err(Error::InvalidSignature(format!(
                    "invalid header byte {}",
                    header
                )))
            }
        };

        let recovery_id = RecoveryId::from_i32(i32::from((header - HEADER_MIN) & 3))?;
        let signature = RecoverableSignature::from_compact(&bytes[1..], recovery_id)?;

        Ok(Self {
            signature: MessageSignature::new(signature, kind != HeaderKind::P2pkhUncompressed),
            kind,
        })
    }

    pub fn from_base64(signature: &str) -> Result<Self, Error> {
        Self::from_slice(&BASE64_STANDARD.decode(signature)?)
    }

    /// Recovers the public key that produced this signature over `message`.
    pub fn recover_pubkey(&self, message: &str) -> Result<PublicKey, Error> {
        let secp = SecpCtx::new();
        self.signature
            .recover_pubkey(&secp, signed_msg_hash(message))
            .map_err(|e| Error::InvalidSignature(e.to_string()))
    }
}

/// Whether `signature` has the BIP-137 shape: 65 bytes after base64 decoding
/// with a header byte in the recognised range.
pub fn is_bip137_signature(signature: &str) -> bool {
    BASE64_STANDARD.decode(signature).map_or(false, |bytes| {
        bytes.len() == SIGNATURE_LENGTH && (HEADER_MIN..=HEADER_MAX).contains(&bytes[0])
    })
}

/// Signs `message` with the legacy "Bitcoin Signed Message" scheme and
/// returns the base64 encoded 65-byte signature.
pub fn sign_legacy(private_key: &PrivateKey, message: &str) -> String {
    let secp = SecpCtx::new();
    let digest = Message::from_digest(signed_msg_hash(message).to_byte_array());
    let signature = secp.sign_ecdsa_recoverable(&digest, &private_key.inner);

    MessageSignature::new(signature, private_key.compressed).to_base64()
}

/// Verifies a legacy signature against a P2PKH `address`.
///
/// The recovered key is compared with the address's public key hash; the
/// version byte is not, so the same signature holds for that key on every
/// network. Non P2PKH addresses never verify here.
pub fn verify_legacy(address: &Address, message: &str, signature: &str) -> Result<bool, Error> {
    let Payload::PubkeyHash(expected) = address.payload() else {
        return Ok(false);
    };

    let signature = Bip137Signature::from_base64(signature)?;
    let public_key = match signature.recover_pubkey(message) {
        Ok(public_key) => public_key,
        Err(e) => {
            debug!("BIP-137 public key recovery failed: {}", e);
            return Ok(false);
        }
    };

    Ok(public_key.pubkey_hash() == *expected)
}
