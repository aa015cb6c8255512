//! The BIP-322 message-to-transaction encoding: the tagged message hash, the
//! `to_spend`/`to_sign` transaction pair and the witness codec used for the
//! "simple" signature format.

use alloc::{string::String, vec};

use bitcoin::{
    absolute::LockTime,
    base64::{prelude::BASE64_STANDARD, Engine},
    consensus::encode::{deserialize, serialize},
    hashes::{sha256, Hash, HashEngine},
    opcodes::{all::OP_RETURN, OP_0},
    script::Builder,
    secp256k1::{All, Secp256k1},
    transaction::Version,
    Amount, OutPoint, Psbt, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
};

use crate::Error;

const TAG: &str = "BIP0322-signed-message";

/// Creates the BIP-322 tagged hash of a message.
pub fn tagged_message_hash(message: &[u8]) -> sha256::Hash {
    let mut engine = sha256::Hash::engine();

    let tag_hash = sha256::Hash::hash(TAG.as_bytes());
    engine.input(&tag_hash[..]);
    engine.input(&tag_hash[..]);
    engine.input(message);

    sha256::Hash::from_engine(engine)
}

/// Constructs the "to_spend" transaction committing to `message` and paying
/// to `script_pubkey`. It is never broadcast; only its txid is used.
pub fn to_spend(script_pubkey: &ScriptBuf, message: &str) -> Transaction {
    let outpoint = OutPoint {
        txid: Txid::all_zeros(),
        vout: 0xFFFFFFFF,
    };
    let message_hash = tagged_message_hash(message.as_bytes());
    let script_sig = Builder::new()
        .push_opcode(OP_0)
        .push_slice(message_hash.to_byte_array())
        .into_script();

    Transaction {
        version: Version(0),
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: outpoint,
            script_sig,
            sequence: Sequence::ZERO,
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::ZERO,
            script_pubkey: script_pubkey.clone(),
        }],
    }
}

/// Constructs the unsigned "to_sign" transaction spending output 0 of the
/// `to_spend` transaction identified by `to_spend_txid`.
///
/// The sole input carries a witness UTXO of value 0 paying `script_pubkey`
/// so that segwit sighashes can be computed over it.
pub fn to_sign(to_spend_txid: Txid, script_pubkey: &ScriptBuf) -> Result<Psbt, Error> {
    let outpoint = OutPoint {
        txid: to_spend_txid,
        vout: 0,
    };
    let script_pub_key = Builder::new().push_opcode(OP_RETURN).into_script();

    let tx = Transaction {
        version: Version(0),
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: outpoint,
            sequence: Sequence::ZERO,
            script_sig: ScriptBuf::new(),
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::ZERO,
            script_pubkey: script_pub_key,
        }],
    };

    let mut psbt =
        Psbt::from_unsigned_tx(tx).map_err(|e| Error::ExtractionError(format!("psbt: {}", e)))?;

    psbt.inputs[0].witness_utxo = Some(TxOut {
        value: Amount::ZERO,
        script_pubkey: script_pubkey.clone(),
    });

    Ok(psbt)
}

/// Serializes the finalized witness of the sole `to_sign` input and encodes
/// it as base64.
pub fn encode_witness(to_sign: &Psbt) -> Result<String, Error> {
    let witness = to_sign
        .inputs
        .first()
        .and_then(|input| input.final_script_witness.as_ref())
        .filter(|witness| !witness.is_empty())
        .ok_or(Error::EmptyWitness)?;

    Ok(BASE64_STANDARD.encode(serialize(witness)))
}

/// Decodes a base64 "simple" signature back into a witness stack.
pub fn decode_witness(signature: &str) -> Result<Witness, Error> {
    let bytes = BASE64_STANDARD.decode(signature)?;
    Ok(deserialize::<Witness>(&bytes)?)
}

pub(crate) type SecpCtx = Secp256k1<All>;
