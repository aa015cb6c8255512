//! Message signing for P2PKH and P2WPKH addresses.
//!
//! P2PKH addresses get a legacy BIP-137 signature; P2WPKH addresses get a
//! BIP-322 "simple" signature, the encoded witness of the `to_sign` input.

use alloc::string::{String, ToString};
use core::str::FromStr;

use bitcoin::{
    ecdsa,
    hashes::Hash,
    secp256k1::Message,
    sighash::SighashCache,
    Amount, EcdsaSighashType, NetworkKind, PrivateKey, Psbt, PublicKey, ScriptBuf, Witness,
};
use log::debug;

use crate::{
    encode_witness, sign_legacy, to_sign, to_spend, Address, AddressParams, AddressType, Error,
    Network, SecpCtx,
};

/// Produces BIP-322 and BIP-137 message signatures.
pub struct Signer;

impl Signer {
    /// Signs `message` for `address` with the WIF encoded `private_key`.
    ///
    /// `network` selects the network the key is expected to derive `address`
    /// on; the chain (Bitcoin or Liquid) is taken from the address itself.
    pub fn sign(
        private_key: &str,
        address: &str,
        message: &str,
        network: Network,
    ) -> Result<String, Error> {
        let private_key = PrivateKey::from_wif(private_key).map_err(|_| Error::InvalidPrivateKey)?;

        let address_type = AddressType::from_address(address)?;
        let derive_as = match address_type {
            AddressType::P2pkh | AddressType::ConfidentialP2pkh => AddressType::P2pkh,
            AddressType::P2wpkh => AddressType::P2wpkh,
            other => {
                debug!("refusing to sign for {:?} address {}", other, address);
                return Err(Error::UnsupportedAddressType);
            }
        };

        let secp = SecpCtx::new();
        let public_key = private_key.public_key(&secp);

        let claimed = Address::from_str(address)?;
        let params = AddressParams::new(claimed.params().chain, network);
        let derived = Address::from_public_key(&public_key, derive_as, params)?;
        // testnet and regtest share base58 prefixes, so compare encodings
        if derived.to_string() != claimed.to_unconfidential().to_string() {
            debug!("key derives {} instead of {}", derived, address);
            return Err(Error::KeyAddressMismatch(address.to_string()));
        }

        let wif_matches = matches!(
            (private_key.network, network),
            (NetworkKind::Main, Network::Mainnet)
                | (NetworkKind::Test, Network::Testnet | Network::Regtest)
        );
        if !wif_matches {
            debug!("{:?} key cannot sign for {:?}", private_key.network, network);
            return Err(Error::InvalidPrivateKey);
        }

        if derive_as == AddressType::P2pkh {
            debug!("signing legacy message for {}", address);
            return Ok(sign_legacy(&private_key, message));
        }

        debug!("signing BIP-322 message for {}", address);
        Self::sign_p2wpkh(&private_key, &public_key, &claimed.script_pubkey(), message)
    }

    fn sign_p2wpkh(
        private_key: &PrivateKey,
        public_key: &PublicKey,
        script_pubkey: &ScriptBuf,
        message: &str,
    ) -> Result<String, Error> {
        let secp = SecpCtx::new();

        let to_spend = to_spend(script_pubkey, message);
        let mut to_sign = to_sign(to_spend.compute_txid(), script_pubkey)?;

        let sighash = {
            let mut sighash_cache = SighashCache::new(&to_sign.unsigned_tx);
            sighash_cache
                .p2wpkh_signature_hash(0, script_pubkey, Amount::ZERO, EcdsaSighashType::All)
                .map_err(|_| Error::SighashError)?
        };

        let msg = Message::from_digest(sighash.to_byte_array());
        let signature = ecdsa::Signature {
            signature: secp.sign_ecdsa(&msg, &private_key.inner),
            sighash_type: EcdsaSighashType::All,
        };

        to_sign
            .inputs
            .first_mut()
            .ok_or_else(|| Error::ExtractionError("to_sign input".to_string()))?
            .partial_sigs
            .insert(*public_key, signature);

        finalize_p2wpkh(&mut to_sign)?;
        encode_witness(&to_sign)
    }
}

/// Moves the single partial signature of the `to_sign` input into its final
/// witness: `[signature, public key]`.
fn finalize_p2wpkh(psbt: &mut Psbt) -> Result<(), Error> {
    let input = psbt
        .inputs
        .first_mut()
        .ok_or_else(|| Error::ExtractionError("to_sign input".to_string()))?;

    let (public_key, signature) = input
        .partial_sigs
        .iter()
        .next()
        .map(|(key, sig)| (*key, *sig))
        .ok_or(Error::EmptyWitness)?;

    input.final_script_witness = Some(Witness::from_slice(&[
        signature.to_vec(),
        public_key.to_bytes(),
    ]));
    input.partial_sigs.clear();

    Ok(())
}
