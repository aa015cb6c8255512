//! Message signature verification.
//!
//! A signature is checked with the legacy BIP-137 rules when the address is
//! P2PKH or the signature has the 65-byte BIP-137 shape. Everything else is
//! read as a BIP-322 "simple" signature: the witness of the `to_sign` input.

use core::str::FromStr;

use alloc::string::ToString;
use bitcoin::{
    hashes::Hash,
    key::XOnlyPublicKey,
    secp256k1::{ecdsa::Signature, schnorr, Message},
    sighash::{Prevouts, SighashCache},
    Amount, EcdsaSighashType, PubkeyHash, PublicKey, ScriptBuf, TapSighashType, Transaction,
    TxOut, WPubkeyHash,
};
use log::{debug, trace};

use crate::{
    decode_witness, is_bip137_signature, is_p2wpkh_witness, is_single_key_p2tr_witness, to_sign,
    to_spend, verify_legacy, Address, AddressParams, AddressType, Bip137Signature, Error,
    SecpCtx,
};

/// Verifies BIP-322 and BIP-137 message signatures.
pub struct Verifier;

impl Verifier {
    /// Checks that `signature` proves control of `address` over `message`.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match,
    /// and an error for malformed input or a witness of an unsupported type.
    pub fn verify_signature(address: &str, message: &str, signature: &str) -> Result<bool, Error> {
        let params = AddressParams::from_address(address);
        let address_type = AddressType::from_address(address)?;
        trace!(
            "verifying {:?} address {} on {:?} {:?}",
            address_type,
            address,
            params.chain,
            params.network
        );

        if address_type.is_p2pkh() || is_bip137_signature(signature) {
            return Self::verify_bip137(address, address_type, params, message, signature);
        }

        let address = Address::from_str(address)?;
        let script_pubkey = address.script_pubkey();

        let to_spend = to_spend(&script_pubkey, message);
        let mut to_sign = to_sign(to_spend.compute_txid(), &script_pubkey)?;
        to_sign.inputs[0].final_script_witness = Some(decode_witness(signature)?);
        let to_sign = to_sign.extract_tx_unchecked_fee_rate();

        let witness = &to_sign.input[0].witness;
        if is_p2wpkh_witness(witness) {
            debug!("verifying P2WPKH witness for {}", address);
            Self::verify_p2wpkh(&to_sign, &script_pubkey)
        } else if address_type == AddressType::P2tr && is_single_key_p2tr_witness(witness) {
            debug!("verifying taproot key path witness for {}", address);
            Self::verify_p2tr(&to_sign, &script_pubkey)
        } else {
            debug!(
                "witness with {} items is not supported for {}",
                witness.len(),
                address
            );
            Err(Error::UnsupportedAddress)
        }
    }

    /// Legacy verification. A BIP-137 signature is accepted for every address
    /// type the recovered key derives: P2PKH, P2SH-P2WPKH and P2WPKH.
    fn verify_bip137(
        address: &str,
        address_type: AddressType,
        params: &'static AddressParams,
        message: &str,
        signature: &str,
    ) -> Result<bool, Error> {
        if address_type.is_p2pkh() {
            debug!("verifying legacy signature for {}", address);
            return verify_legacy(&Address::from_str(address)?, message, signature);
        }

        let derive_as = match address_type {
            AddressType::P2sh | AddressType::ConfidentialP2sh => AddressType::P2sh,
            AddressType::P2wpkh => AddressType::P2wpkh,
            other => {
                debug!("BIP-137 signature cannot prove {:?} address", other);
                return Ok(false);
            }
        };

        let public_key = match Bip137Signature::from_base64(signature)?.recover_pubkey(message) {
            Ok(public_key) if public_key.compressed => public_key,
            Ok(_) => {
                debug!("uncompressed key cannot control {}", address);
                return Ok(false);
            }
            Err(e) => {
                debug!("BIP-137 public key recovery failed: {}", e);
                return Ok(false);
            }
        };

        let derived = Address::from_public_key(&public_key, derive_as, params)?;
        let claimed = Address::from_str(address)?.to_unconfidential();
        if derived.to_string() != claimed.to_string() {
            debug!("recovered key derives {} instead of {}", derived, address);
            return Ok(false);
        }

        let legacy = Address::from_public_key(&public_key, AddressType::P2pkh, params)?;
        verify_legacy(&legacy, message, signature)
    }

    /// Verifies a `[signature, public key]` witness for a native or nested
    /// P2WPKH locking script.
    fn verify_p2wpkh(to_sign: &Transaction, script_pubkey: &ScriptBuf) -> Result<bool, Error> {
        let secp = SecpCtx::new();
        let witness = &to_sign.input[0].witness;

        let (Some(encoded_signature), Some(witness_pub_key)) = (witness.nth(0), witness.nth(1))
        else {
            return Err(Error::UnsupportedAddress);
        };
        if encoded_signature.is_empty() {
            return Ok(false);
        }

        // hashed before parsing: an off-curve key is a mismatch, not an error
        let hashed_pubkey = PubkeyHash::hash(witness_pub_key);

        let script_bytes = script_pubkey.as_bytes();
        if script_pubkey.is_p2sh() {
            let redeem_script =
                ScriptBuf::new_p2wpkh(&WPubkeyHash::from_raw_hash(hashed_pubkey.to_raw_hash()));
            if script_bytes.get(2..script_bytes.len() - 1)
                != Some(redeem_script.script_hash().as_byte_array().as_slice())
            {
                trace!("redeem script does not hash to {}", script_pubkey);
                return Ok(false);
            }
        } else if script_bytes.get(2..) != Some(hashed_pubkey.as_byte_array().as_slice()) {
            trace!("witness key does not hash to {}", script_pubkey);
            return Ok(false);
        }

        let Ok(pub_key) = PublicKey::from_slice(witness_pub_key) else {
            trace!("witness key is not a valid public key");
            return Ok(false);
        };

        let signature_length = encoded_signature.len();
        let mut signature = Signature::from_der(&encoded_signature[..signature_length - 1])?;
        signature.normalize_s();

        // the script code of a P2WPKH spend is the P2PKH script of its key hash
        let script_code = ScriptBuf::new_p2pkh(&hashed_pubkey);
        let sighash = SighashCache::new(to_sign)
            .p2wsh_signature_hash(0, &script_code, Amount::ZERO, EcdsaSighashType::All)
            .map_err(|_| Error::SighashError)?;

        let msg = Message::from_digest(sighash.to_byte_array());
        Ok(secp.verify_ecdsa(&msg, &signature, &pub_key.inner).is_ok())
    }

    /// Verifies a taproot key path signature against the output key of
    /// `script_pubkey`.
    fn verify_p2tr(to_sign: &Transaction, script_pubkey: &ScriptBuf) -> Result<bool, Error> {
        let secp = SecpCtx::new();

        let output_key = script_pubkey
            .as_bytes()
            .get(2..)
            .ok_or(Error::UnsupportedAddress)
            .and_then(|key| {
                XOnlyPublicKey::from_slice(key).map_err(|e| Error::InvalidPublicKey(e.to_string()))
            })?;

        let encoded_signature = to_sign.input[0]
            .witness
            .nth(0)
            .ok_or(Error::UnsupportedAddress)?;
        let signature = schnorr::Signature::from_slice(&encoded_signature[..64])?;
        let sighash_type = match encoded_signature.get(64) {
            // SIGHASH_DEFAULT is only valid when left implicit
            Some(0x00) => {
                debug!("explicit SIGHASH_DEFAULT byte in taproot signature");
                return Ok(false);
            }
            Some(&byte) => TapSighashType::from_consensus_u8(byte)
                .map_err(|e| Error::InvalidSignature(e.to_string()))?,
            None => TapSighashType::Default,
        };

        let prevouts = [TxOut {
            value: Amount::ZERO,
            script_pubkey: script_pubkey.clone(),
        }];
        let sighash = SighashCache::new(to_sign)
            .taproot_key_spend_signature_hash(0, &Prevouts::All(&prevouts), sighash_type)
            .map_err(|_| Error::SighashError)?;

        let msg = Message::from_digest(sighash.to_byte_array());
        Ok(secp.verify_schnorr(&signature, &msg, &output_key).is_ok())
    }
}
