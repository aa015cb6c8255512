//! Address classification and conversion for Bitcoin and Liquid networks.
//!
//! Addresses are classified from their prefix (base58 version bytes, or the
//! bech32/blech32 human readable part and witness version) before any
//! checksum is verified. Parsing into an [`Address`] checks the checksum and
//! yields the locking script; [`Address::from_public_key`] goes the other way.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, str::FromStr};

use bitcoin::{
    base58,
    bech32::{segwit, Fe32, Hrp},
    hashes::Hash,
    secp256k1::{self, Secp256k1},
    PubkeyHash, PublicKey, ScriptBuf, ScriptHash, Witness, WitnessProgram, WitnessVersion,
};

use crate::{blech32, Error};

/// Network an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    /// Production network
    Mainnet,
    /// Public test network
    Testnet,
    /// Local regression test network
    Regtest,
}

impl Network {
    /// Detects the network from an address prefix, falling back to
    /// [`Network::Mainnet`] when the prefix is not recognised.
    pub fn from_address(address: &str) -> Network {
        AddressParams::from_address(address).network
    }
}

/// Chain family an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Chain {
    /// Bitcoin
    Bitcoin,
    /// Liquid and other Elements based sidechains
    Liquid,
}

/// Encoding parameters of one chain and network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressParams {
    /// Chain family
    pub chain: Chain,
    /// Network within the chain
    pub network: Network,
    /// Base58 version byte of P2PKH addresses
    pub p2pkh_prefix: u8,
    /// Base58 version byte of P2SH addresses
    pub p2sh_prefix: u8,
    /// Base58 prefix byte of confidential addresses
    pub blinded_prefix: Option<u8>,
    /// Bech32 human readable part
    pub bech_hrp: &'static str,
    /// Blech32 human readable part of confidential segwit addresses
    pub blech_hrp: Option<&'static str>,
}

impl AddressParams {
    pub const BITCOIN: AddressParams = AddressParams {
        chain: Chain::Bitcoin,
        network: Network::Mainnet,
        p2pkh_prefix: 0,
        p2sh_prefix: 5,
        blinded_prefix: None,
        bech_hrp: "bc",
        blech_hrp: None,
    };

    pub const BITCOIN_TESTNET: AddressParams = AddressParams {
        chain: Chain::Bitcoin,
        network: Network::Testnet,
        p2pkh_prefix: 111,
        p2sh_prefix: 196,
        blinded_prefix: None,
        bech_hrp: "tb",
        blech_hrp: None,
    };

    pub const BITCOIN_REGTEST: AddressParams = AddressParams {
        chain: Chain::Bitcoin,
        network: Network::Regtest,
        p2pkh_prefix: 111,
        p2sh_prefix: 196,
        blinded_prefix: None,
        bech_hrp: "bcrt",
        blech_hrp: None,
    };

    pub const LIQUID: AddressParams = AddressParams {
        chain: Chain::Liquid,
        network: Network::Mainnet,
        p2pkh_prefix: 57,
        p2sh_prefix: 39,
        blinded_prefix: Some(12),
        bech_hrp: "ex",
        blech_hrp: Some("lq"),
    };

    pub const LIQUID_TESTNET: AddressParams = AddressParams {
        chain: Chain::Liquid,
        network: Network::Testnet,
        p2pkh_prefix: 36,
        p2sh_prefix: 19,
        blinded_prefix: Some(23),
        bech_hrp: "tex",
        blech_hrp: Some("tlq"),
    };

    pub const ELEMENTS: AddressParams = AddressParams {
        chain: Chain::Liquid,
        network: Network::Regtest,
        p2pkh_prefix: 235,
        p2sh_prefix: 75,
        blinded_prefix: Some(4),
        bech_hrp: "ert",
        blech_hrp: Some("el"),
    };

    // Bitcoin testnet precedes regtest: their base58 prefixes coincide.
    const ALL: [&'static AddressParams; 6] = [
        &Self::BITCOIN,
        &Self::BITCOIN_TESTNET,
        &Self::BITCOIN_REGTEST,
        &Self::LIQUID,
        &Self::LIQUID_TESTNET,
        &Self::ELEMENTS,
    ];

    /// Returns the parameters of `network` on `chain`.
    pub fn new(chain: Chain, network: Network) -> &'static AddressParams {
        match (chain, network) {
            (Chain::Bitcoin, Network::Mainnet) => &Self::BITCOIN,
            (Chain::Bitcoin, Network::Testnet) => &Self::BITCOIN_TESTNET,
            (Chain::Bitcoin, Network::Regtest) => &Self::BITCOIN_REGTEST,
            (Chain::Liquid, Network::Mainnet) => &Self::LIQUID,
            (Chain::Liquid, Network::Testnet) => &Self::LIQUID_TESTNET,
            (Chain::Liquid, Network::Regtest) => &Self::ELEMENTS,
        }
    }

    /// Detects the parameters from an address prefix, falling back to Bitcoin
    /// mainnet when the prefix is not recognised.
    pub fn from_address(address: &str) -> &'static AddressParams {
        Prefix::read(address).map_or(&Self::BITCOIN, |prefix| prefix.params())
    }
}

/// Address type as announced by an address string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
    ConfidentialP2pkh,
    ConfidentialP2sh,
    ConfidentialP2wsh,
    Unknown,
}

impl AddressType {
    /// Classifies an address string.
    ///
    /// Base58 addresses are classified by their version bytes without
    /// checking the checksum. Witness v0 addresses are decoded, since P2WPKH
    /// and P2WSH only differ in program length, so a malformed v0 string
    /// returns the decoding error. Strings without a known prefix classify as
    /// [`AddressType::Unknown`].
    pub fn from_address(address: &str) -> Result<AddressType, Error> {
        let address_type = match Prefix::read(address) {
            None => AddressType::Unknown,
            Some(Prefix::Base58 {
                params,
                version,
                blinded,
            }) => match (version == params.p2pkh_prefix, blinded) {
                (true, false) => AddressType::P2pkh,
                (true, true) => AddressType::ConfidentialP2pkh,
                (false, false) => AddressType::P2sh,
                (false, true) => AddressType::ConfidentialP2sh,
            },
            Some(Prefix::Segwit {
                blinded,
                witness_version,
                ..
            }) => match witness_version {
                Some('q') => Address::from_str(address)?.address_type(),
                Some('p') if !blinded => AddressType::P2tr,
                _ => AddressType::Unknown,
            },
        };

        Ok(address_type)
    }

    /// Whether the type pays to a public key hash, confidential or not.
    pub fn is_p2pkh(&self) -> bool {
        matches!(self, AddressType::P2pkh | AddressType::ConfidentialP2pkh)
    }

    /// Whether the type pays to a script hash, confidential or not.
    pub fn is_p2sh(&self) -> bool {
        matches!(self, AddressType::P2sh | AddressType::ConfidentialP2sh)
    }
}

/// What an address string announces before its checksum is looked at.
enum Prefix {
    Base58 {
        params: &'static AddressParams,
        version: u8,
        blinded: bool,
    },
    Segwit {
        params: &'static AddressParams,
        blinded: bool,
        witness_version: Option<char>,
    },
}

impl Prefix {
    fn read(address: &str) -> Option<Prefix> {
        if let Some(separator) = address.rfind('1') {
            let hrp = address[..separator].to_lowercase();
            let witness_version = address[separator + 1..]
                .chars()
                .next()
                .map(|c| c.to_ascii_lowercase());

            for params in AddressParams::ALL {
                if params.bech_hrp == hrp || params.blech_hrp == Some(hrp.as_str()) {
                    return Some(Prefix::Segwit {
                        params,
                        blinded: params.bech_hrp != hrp,
                        witness_version,
                    });
                }
            }
        }

        let data = base58::decode(address).ok()?;
        let (version, blinded) = match data.len() {
            25 => (data[0], None),
            59 => (data[1], Some(data[0])),
            _ => return None,
        };

        AddressParams::ALL
            .into_iter()
            .find(|params| {
                (params.p2pkh_prefix == version || params.p2sh_prefix == version)
                    && (blinded.is_none() || params.blinded_prefix == blinded)
            })
            .map(|params| Prefix::Base58 {
                params,
                version,
                blinded: blinded.is_some(),
            })
    }

    fn params(&self) -> &'static AddressParams {
        match self {
            Prefix::Base58 { params, .. } | Prefix::Segwit { params, .. } => params,
        }
    }
}

/// The locking condition an address commits to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    PubkeyHash(PubkeyHash),
    ScriptHash(ScriptHash),
    WitnessProgram(WitnessProgram),
}

/// A parsed Bitcoin or Liquid address, optionally carrying a blinding key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    params: &'static AddressParams,
    payload: Payload,
    blinding_pubkey: Option<secp256k1::PublicKey>,
}

impl Address {
    /// Derives the address of `address_type` controlled by `public_key`.
    ///
    /// [`AddressType::P2sh`] derives a P2SH-P2WPKH address and
    /// [`AddressType::P2tr`] a key-path only taproot address.
    pub fn from_public_key(
        public_key: &PublicKey,
        address_type: AddressType,
        params: &'static AddressParams,
    ) -> Result<Address, Error> {
        let payload = match address_type {
            AddressType::P2pkh => Payload::PubkeyHash(public_key.pubkey_hash()),
            AddressType::P2sh => {
                let redeem_script = ScriptBuf::new_p2wpkh(&wpubkey_hash(public_key)?);
                Payload::ScriptHash(redeem_script.script_hash())
            }
            AddressType::P2wpkh => {
                let hash = wpubkey_hash(public_key)?;
                Payload::WitnessProgram(witness_program(Fe32::Q, &hash[..])?)
            }
            AddressType::P2tr => {
                let secp = Secp256k1::verification_only();
                let (internal_key, _) = public_key.inner.x_only_public_key();
                Payload::WitnessProgram(WitnessProgram::p2tr(&secp, internal_key, None))
            }
            other => return Err(Error::UnsupportedKeyDerivation(other)),
        };

        Ok(Address {
            params,
            payload,
            blinding_pubkey: None,
        })
    }

    pub fn params(&self) -> &'static AddressParams {
        self.params
    }

    pub fn network(&self) -> Network {
        self.params.network
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn blinding_pubkey(&self) -> Option<&secp256k1::PublicKey> {
        self.blinding_pubkey.as_ref()
    }

    pub fn is_confidential(&self) -> bool {
        self.blinding_pubkey.is_some()
    }

    /// Returns the same address with the blinding key removed.
    pub fn to_unconfidential(&self) -> Address {
        Address {
            blinding_pubkey: None,
            ..self.clone()
        }
    }

    /// The type of this address.
    pub fn address_type(&self) -> AddressType {
        let confidential = self.is_confidential();
        match &self.payload {
            Payload::PubkeyHash(_) if confidential => AddressType::ConfidentialP2pkh,
            Payload::PubkeyHash(_) => AddressType::P2pkh,
            Payload::ScriptHash(_) if confidential => AddressType::ConfidentialP2sh,
            Payload::ScriptHash(_) => AddressType::P2sh,
            Payload::WitnessProgram(program) if program.is_p2wpkh() => AddressType::P2wpkh,
            Payload::WitnessProgram(program) if program.is_p2wsh() && confidential => {
                AddressType::ConfidentialP2wsh
            }
            Payload::WitnessProgram(program) if program.is_p2wsh() => AddressType::P2wsh,
            Payload::WitnessProgram(program) if program.is_p2tr() && !confidential => {
                AddressType::P2tr
            }
            Payload::WitnessProgram(_) => AddressType::Unknown,
        }
    }

    /// The locking script of this address. Confidential addresses lock to the
    /// same script as their unconfidential form.
    pub fn script_pubkey(&self) -> ScriptBuf {
        match &self.payload {
            Payload::PubkeyHash(hash) => ScriptBuf::new_p2pkh(hash),
            Payload::ScriptHash(hash) => ScriptBuf::new_p2sh(hash),
            Payload::WitnessProgram(program) => ScriptBuf::new_witness_program(program),
        }
    }

    fn from_base58(s: &str, params: &'static AddressParams) -> Result<Address, Error> {
        let data = base58::decode_check(s)?;
        let (version, blinding_pubkey, hash) = match data.len() {
            21 => (data[0], None, &data[1..]),
            55 if params.blinded_prefix == Some(data[0]) => {
                let blinder = secp256k1::PublicKey::from_slice(&data[2..35])
                    .map_err(|e| Error::InvalidPublicKey(e.to_string()))?;
                (data[1], Some(blinder), &data[35..])
            }
            len => {
                return Err(Error::InvalidAddress(format!(
                    "invalid base58 payload length {}",
                    len
                )))
            }
        };

        let hash: [u8; 20] = hash
            .try_into()
            .map_err(|_| Error::InvalidAddress("invalid hash length".to_string()))?;
        let payload = if version == params.p2pkh_prefix {
            Payload::PubkeyHash(PubkeyHash::from_byte_array(hash))
        } else if version == params.p2sh_prefix {
            Payload::ScriptHash(ScriptHash::from_byte_array(hash))
        } else {
            return Err(Error::InvalidAddress(format!(
                "unexpected version byte {}",
                version
            )));
        };

        Ok(Address {
            params,
            payload,
            blinding_pubkey,
        })
    }

    fn from_bech32(s: &str, params: &'static AddressParams) -> Result<Address, Error> {
        let (_, version, program) =
            segwit::decode(s).map_err(|e| Error::InvalidAddress(e.to_string()))?;

        Ok(Address {
            params,
            payload: Payload::WitnessProgram(witness_program(version, &program)?),
            blinding_pubkey: None,
        })
    }

    fn from_blech32(s: &str, params: &'static AddressParams) -> Result<Address, Error> {
        let (_, version, data) = blech32::decode(s)?;
        if data.len() < 33 {
            return Err(Error::InvalidAddress(
                "confidential payload too short".to_string(),
            ));
        }
        let blinder = secp256k1::PublicKey::from_slice(&data[..33])
            .map_err(|e| Error::InvalidPublicKey(e.to_string()))?;

        Ok(Address {
            params,
            payload: Payload::WitnessProgram(witness_program(version, &data[33..])?),
            blinding_pubkey: Some(blinder),
        })
    }

    fn fmt_base58(&self, f: &mut fmt::Formatter, version: u8, hash: &[u8]) -> fmt::Result {
        let mut data = Vec::with_capacity(55);
        if let Some(blinder) = &self.blinding_pubkey {
            data.push(self.params.blinded_prefix.ok_or(fmt::Error)?);
            data.push(version);
            data.extend_from_slice(&blinder.serialize());
        } else {
            data.push(version);
        }
        data.extend_from_slice(hash);

        f.write_str(&base58::encode_check(&data))
    }

    fn fmt_segwit(&self, f: &mut fmt::Formatter, program: &WitnessProgram) -> fmt::Result {
        let version = Fe32::try_from(program.version().to_num()).map_err(|_| fmt::Error)?;
        let program = program.program().as_bytes();

        let encoded: String = match &self.blinding_pubkey {
            None => {
                let hrp = Hrp::parse(self.params.bech_hrp).map_err(|_| fmt::Error)?;
                segwit::encode(hrp, version, program).map_err(|_| fmt::Error)?
            }
            Some(blinder) => {
                let hrp = Hrp::parse(self.params.blech_hrp.ok_or(fmt::Error)?)
                    .map_err(|_| fmt::Error)?;
                let mut data = Vec::with_capacity(33 + program.len());
                data.extend_from_slice(&blinder.serialize());
                data.extend_from_slice(program);
                blech32::encode(&hrp, version, &data)
            }
        };

        f.write_str(&encoded)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Prefix::read(s).ok_or(Error::UnknownAddressType)? {
            Prefix::Base58 { params, .. } => Address::from_base58(s, params),
            Prefix::Segwit {
                params,
                blinded: false,
                ..
            } => Address::from_bech32(s, params),
            Prefix::Segwit {
                params,
                blinded: true,
                ..
            } => Address::from_blech32(s, params),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.payload {
            Payload::PubkeyHash(hash) => self.fmt_base58(f, self.params.p2pkh_prefix, &hash[..]),
            Payload::ScriptHash(hash) => self.fmt_base58(f, self.params.p2sh_prefix, &hash[..]),
            Payload::WitnessProgram(program) => self.fmt_segwit(f, program),
        }
    }
}

fn wpubkey_hash(public_key: &PublicKey) -> Result<bitcoin::WPubkeyHash, Error> {
    public_key
        .wpubkey_hash()
        .map_err(|e| Error::InvalidPublicKey(e.to_string()))
}

fn witness_program(version: Fe32, program: &[u8]) -> Result<WitnessProgram, Error> {
    let version = WitnessVersion::try_from(version.to_u8())
        .map_err(|e| Error::InvalidAddress(e.to_string()))?;
    WitnessProgram::new(version, program).map_err(|e| Error::InvalidAddress(e.to_string()))
}

/// Whether a witness stack has the P2WPKH shape: a signature followed by a
/// compressed public key.
pub fn is_p2wpkh_witness(witness: &Witness) -> bool {
    witness.len() == 2
        && witness
            .nth(1)
            .map_or(false, |key| key.len() == 33 && (key[0] == 0x02 || key[0] == 0x03))
}

/// Whether a witness stack has the taproot key-path shape: a single schnorr
/// signature, with or without an explicit sighash byte.
pub fn is_single_key_p2tr_witness(witness: &Witness) -> bool {
    witness.len() == 1 && matches!(witness.nth(0).map(<[u8]>::len), Some(64 | 65))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_KEY: &str = "02c7f12003196442943d8588e01aee840423cc54fc1521526a3b85c2b0cbd58872";

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn public_key() -> PublicKey {
        PublicKey::from_str(PUBLIC_KEY).unwrap()
    }

    fn classify(address: &str) -> AddressType {
        AddressType::from_address(address).unwrap()
    }

    #[test]
    fn test_classify_bitcoin_addresses() {
        let cases = [
            ("17VZNX1SN5NtKa8UQFxwQbFeFc3iqRYhem", AddressType::P2pkh),
            ("mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn", AddressType::P2pkh),
            ("n11112Lo13n4GvQhQpDtLY8KH7KNeCVmvw", AddressType::P2pkh),
            ("3EktnHQD7RiAE6uzMj2ZifT9YgRrkSgzQX", AddressType::P2sh),
            ("2MzQwSSnBHWHqSAqtTVQ6v47XtaisrJa1Vc", AddressType::P2sh),
            ("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", AddressType::P2wpkh),
            ("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx", AddressType::P2wpkh),
            (
                "bc1qeklep85ntjz4605drds6aww9u0qr46qzrv5xswd35uhjuj8ahfcqgf6hak",
                AddressType::P2wsh,
            ),
            (
                "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
                AddressType::P2wsh,
            ),
            (
                "bc1p000022222333333444444455555555666666666999999999zz9qzagays",
                AddressType::P2tr,
            ),
            (
                "tb1p000273lqsqqfw2a6h2vqxr2tll4wgtv7zu8a30rz4mhree8q5jzq8cjtyp",
                AddressType::P2tr,
            ),
        ];

        for (address, expected) in cases {
            assert_eq!(classify(address), expected, "{}", address);
        }
    }

    #[test]
    fn test_classify_liquid_addresses() {
        let cases = [
            ("Q1BsAmBhevrqCnYh3hjXvk9sQuwVG5SxwG", AddressType::P2pkh),
            ("FZ6CVUvek98S2gcsXtjqk7SMCKXgM3CgTN", AddressType::P2pkh),
            ("2ddMES6Ez33LnmwN7QP2GF4buShoPtX3yP8", AddressType::P2pkh),
            ("GoLVHosCK8bNqaw8edFLNbUfK95EhQPYZ7", AddressType::P2sh),
            ("8kaRbduS7XKrUv9QAEaxg62vj3vNRkgMzK", AddressType::P2sh),
            ("XHWCjibZsdGvHBxFXjEoq7GyyJMCKRo3wo", AddressType::P2sh),
            ("ex1q9vza2e8x573nczrlzms0wvx3gsqjx7vaxpt7zl", AddressType::P2wpkh),
            ("tex1q9vza2e8x573nczrlzms0wvx3gsqjx7vau8eh75", AddressType::P2wpkh),
            ("ert1q9vza2e8x573nczrlzms0wvx3gsqjx7vaunpxa9", AddressType::P2wpkh),
            (
                "ex1qj99wcphdxszal0xff98mzvtfap2xl6ylx8nxxr8s53gxmv5yq4ds6efcwu",
                AddressType::P2wsh,
            ),
            (
                "VTpyShr5ry83bPEVLckE6nLeND32UYQrG4rNwmmbTBGdjKbFotSxvweWc8AuZLTawgTQgGRPNyVAc3CQ",
                AddressType::ConfidentialP2pkh,
            ),
            (
                "vtSBv6vsNd6KKhn6wma6wUyiagZMRMweB8sXh7EWV4cbqNbjB81HTurCF6phrYckN7YzS74snALC1aiN",
                AddressType::ConfidentialP2pkh,
            ),
            (
                "VJLAxr3JQyzrbdWqz7ijcY8fHzs5U16x7B9y9cULrWbF6vfRNqk3qZMzHxUmuZQxZVcXT9EDNLPPZTJd",
                AddressType::ConfidentialP2sh,
            ),
            (
                "AzppPJYbtfvLBbhkFjWixVUtjeoWRfVmrswfXFSspdnkJ54SuX85rP96X1stSfaiS5G2kcwZVbD1Nf7Q",
                AddressType::ConfidentialP2sh,
            ),
            (
                "lq1qqtrlzgqrr9jy99paskywqxhwsszz8nz5ls2jz5n28wzu9vxt6ky8y2c964jwdfar8sy879hq7ucdz3qpydue6mt0fumvac49n",
                AddressType::P2wpkh,
            ),
            (
                "lq1qqtrlzgqrr9jy99paskywqxhwsszz8nz5ls2jz5n28wzu9vxt6ky89y22asrw6dq9m77vjj20kyckn6z5dl5f7v0xvvx0pfzsdkeggp2mj6gtfymyhtfs",
                AddressType::ConfidentialP2wsh,
            ),
        ];

        for (address, expected) in cases {
            assert_eq!(classify(address), expected, "{}", address);
        }
    }

    #[test]
    fn test_classify_unknown_and_malformed() {
        assert_eq!(
            classify("bc1wtfpv609nr0vr25u07u95waq5lucwfm6tde4nydujnu8npg4q75mr5sxq8lt3"),
            AddressType::Unknown
        );
        assert_eq!(
            classify("bc1apv609nr0vr25u07u95waq5lucwfm6tde4nydujnu8npg4q75mr5sxq8lt3"),
            AddressType::Unknown
        );
        assert_eq!(classify("not an address"), AddressType::Unknown);

        // a v0 prefix needs decoding, so a broken checksum is an error
        assert!(matches!(
            AddressType::from_address("ex1q9vza2e8x573nczrlzms0wvx3gsqjx7vaxpt7zlm"),
            Err(Error::InvalidAddress(_))
        ));

        assert!(matches!(
            Address::from_str("bc1wtfpv609nr0vr25u07u95waq5lucwfm6tde4nydujnu8npg4q75mr5sxq8lt3"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            Address::from_str("not an address"),
            Err(Error::UnknownAddressType)
        ));
    }

    #[test]
    fn test_script_pubkey() {
        let cases = [
            (
                "17VZNX1SN5NtKa8UQFxwQbFeFc3iqRYhem",
                "76a91447376c6f537d62177a2c41c4ca9b45829ab9908388ac",
            ),
            (
                "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn",
                "76a914243f1394f44554f4ce3fd68649c19adc483ce92488ac",
            ),
            (
                "3EktnHQD7RiAE6uzMj2ZifT9YgRrkSgzQX",
                "a9148f55563b9a19f321c211e9b9f38cdf686ea0784587",
            ),
            (
                "2MzQwSSnBHWHqSAqtTVQ6v47XtaisrJa1Vc",
                "a9144e9f39ca4688ff102128ea4ccda34105324305b087",
            ),
            (
                "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
                "0014751e76e8199196d454941c45d1b3a323f1433bd6",
            ),
            (
                "bc1qeklep85ntjz4605drds6aww9u0qr46qzrv5xswd35uhjuj8ahfcqgf6hak",
                "0020cdbf909e935c855d3e8d1b61aeb9c5e3c03ae8021b286839b1a72f2e48fdba70",
            ),
            (
                "bc1p000022222333333444444455555555666666666999999999zz9qzagays",
                "51207bdef5294a546318c635ad6b5ad694a5294a535ad6b5ad6b45294a5294a5108a",
            ),
            (
                "Q1BsAmBhevrqCnYh3hjXvk9sQuwVG5SxwG",
                "76a9142b05d564e6a7a33c087f16e0f730d1440123799d88ac",
            ),
            (
                "VJLAxr3JQyzrbdWqz7ijcY8fHzs5U16x7B9y9cULrWbF6vfRNqk3qZMzHxUmuZQxZVcXT9EDNLPPZTJd",
                "a9144382bc8115ce44d91b3de0d21836c6f1ecc4f85187",
            ),
            (
                "lq1qqf8er278e6nyvuwtgf39e6ewvdcnjupn9a86rzpx655y5lhkt0walu3djf9cklkxd3ryld97hu8h3xepw7sh2rlu7q45dcew5",
                "0014f22d924b8b7ec66c464fb4bebf0f789b2177a175",
            ),
            (
                "tlq1qq2xvpcvfup5j8zscjq05u2wxxjcyewk7979f3mmz5l7uw5pqmx6xf5xy50hsn6vhkm5euwt72x878eq6zxx2z58hd7zrsg9qn",
                "0014d0c4a3ef09e997b6e99e397e518fe3e41a118ca1",
            ),
        ];

        for (address, script) in cases {
            let parsed = Address::from_str(address).unwrap();
            assert_eq!(hex(parsed.script_pubkey().as_bytes()), script, "{}", address);
        }
    }

    #[test]
    fn test_display_is_canonical() {
        let addresses = [
            "14vV3aCHBeStb5bkenkNHbe2YAFinYdXgc",
            "2MyQBsrfRnTLwEdpjVVYNWHDB8LXLJUcub9",
            "bc1ppv609nr0vr25u07u95waq5lucwfm6tde4nydujnu8npg4q75mr5sxq8lt3",
            "CTEq6iP86Y8gbBs2WQQeQ16XbxmiWTo6n8oXvtynFEGfCvCqgwj1GGoQ7ScFXaKb5CTckM24u1UdvThT",
            "el1qqw3e3mk4ng3ks43mh54udznuekaadh9lgwef3mwgzrfzakmdwcvqpe4ppdaa3t44v3zv2u6w56pv6tc666fvgzaclqjnkz0sd",
        ];
        for address in addresses {
            assert_eq!(Address::from_str(address).unwrap().to_string(), address);
        }

        let upper = "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4";
        assert_eq!(
            Address::from_str(upper).unwrap().to_string(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    #[test]
    fn test_to_unconfidential() {
        let confidential = Address::from_str(
            "lq1qqf8er278e6nyvuwtgf39e6ewvdcnjupn9a86rzpx655y5lhkt0walu3djf9cklkxd3ryld97hu8h3xepw7sh2rlu7q45dcew5",
        )
        .unwrap();
        assert!(confidential.is_confidential());
        assert_eq!(
            hex(&confidential.blinding_pubkey().unwrap().serialize()),
            "024f91abc7cea64671cb42625ceb2e63713970332f4fa18826d5284a7ef65bdddf"
        );

        let unconfidential = confidential.to_unconfidential();
        assert!(!unconfidential.is_confidential());
        assert_eq!(
            unconfidential.to_string(),
            "ex1q7gkeyjut0mrxc3j0kjlt7rmcnvsh0gt45d3fud"
        );
        assert_eq!(unconfidential.script_pubkey(), confidential.script_pubkey());

        let confidential_p2pkh = Address::from_str(
            "vtSBv6vsNd6KKhn6wma6wUyiagZMRMweB8sXh7EWV4cbqNbjB81HTurCF6phrYckN7YzS74snALC1aiN",
        )
        .unwrap();
        assert_eq!(
            confidential_p2pkh.to_unconfidential().to_string(),
            "FZ6CVUvek98S2gcsXtjqk7SMCKXgM3CgTN"
        );
    }

    #[test]
    fn test_from_public_key() {
        let public_key = public_key();
        let derive = |address_type: AddressType, params: &'static AddressParams| {
            Address::from_public_key(&public_key, address_type, params)
                .unwrap()
                .to_string()
        };

        assert_eq!(
            derive(AddressType::P2pkh, &AddressParams::BITCOIN),
            "14vV3aCHBeStb5bkenkNHbe2YAFinYdXgc"
        );
        assert_eq!(
            derive(AddressType::P2pkh, &AddressParams::BITCOIN_TESTNET),
            "mjSSLdHFzft9NC5NNMik7WrMQ9rRhMhNpT"
        );
        assert_eq!(
            derive(AddressType::P2sh, &AddressParams::BITCOIN),
            "37qyp7jQAzqb2rCBpMvVtLDuuzKAUCVnJb"
        );
        assert_eq!(
            derive(AddressType::P2sh, &AddressParams::BITCOIN_TESTNET),
            "2MyQBsrfRnTLwEdpjVVYNWHDB8LXLJUcub9"
        );
        assert_eq!(
            derive(AddressType::P2wpkh, &AddressParams::BITCOIN),
            "bc1q9vza2e8x573nczrlzms0wvx3gsqjx7vavgkx0l"
        );
        assert_eq!(
            derive(AddressType::P2wpkh, &AddressParams::BITCOIN_TESTNET),
            "tb1q9vza2e8x573nczrlzms0wvx3gsqjx7vaxwd45v"
        );
        assert_eq!(
            derive(AddressType::P2wpkh, &AddressParams::BITCOIN_REGTEST),
            "bcrt1q9vza2e8x573nczrlzms0wvx3gsqjx7vay85cr9"
        );
        assert_eq!(
            derive(AddressType::P2tr, &AddressParams::BITCOIN),
            "bc1ppv609nr0vr25u07u95waq5lucwfm6tde4nydujnu8npg4q75mr5sxq8lt3"
        );
        assert_eq!(
            derive(AddressType::P2tr, &AddressParams::BITCOIN_TESTNET),
            "tb1ppv609nr0vr25u07u95waq5lucwfm6tde4nydujnu8npg4q75mr5s3g3s37"
        );
        assert_eq!(
            derive(AddressType::P2pkh, &AddressParams::LIQUID),
            "Q1BsAmBhevrqCnYh3hjXvk9sQuwVG5SxwG"
        );
        assert_eq!(
            derive(AddressType::P2sh, &AddressParams::LIQUID_TESTNET),
            "8kaRbduS7XKrUv9QAEaxg62vj3vNRkgMzK"
        );
        assert_eq!(
            derive(AddressType::P2wpkh, &AddressParams::ELEMENTS),
            "ert1q9vza2e8x573nczrlzms0wvx3gsqjx7vaunpxa9"
        );

        assert!(matches!(
            Address::from_public_key(&public_key, AddressType::P2wsh, &AddressParams::BITCOIN),
            Err(Error::UnsupportedKeyDerivation(AddressType::P2wsh))
        ));
    }

    #[test]
    fn test_network_from_address() {
        assert_eq!(
            Network::from_address("ex1q9vza2e8x573nczrlzms0wvx3gsqjx7vaxpt7zl"),
            Network::Mainnet
        );
        assert_eq!(
            Network::from_address("FZ6CVUvek98S2gcsXtjqk7SMCKXgM3CgTN"),
            Network::Testnet
        );
        assert_eq!(
            Network::from_address("bcrt1q9vza2e8x573nczrlzms0wvx3gsqjx7vay85cr9"),
            Network::Regtest
        );
        assert_eq!(
            Network::from_address(
                "el1qqw3e3mk4ng3ks43mh54udznuekaadh9lgwef3mwgzrfzakmdwcvqpe4ppdaa3t44v3zv2u6w56pv6tc666fvgzaclqjnkz0sd"
            ),
            Network::Regtest
        );
        assert_eq!(Network::from_address("garbage"), Network::Mainnet);

        assert_eq!(
            AddressParams::from_address("VTpyShr5ry83bPEVLckE6nLeND32UYQrG4rNwmmbTBGdjKbFotSxvweWc8AuZLTawgTQgGRPNyVAc3CQ"),
            &AddressParams::LIQUID
        );
        assert_eq!(
            AddressParams::new(Chain::Liquid, Network::Testnet),
            &AddressParams::LIQUID_TESTNET
        );
    }

    #[test]
    fn test_witness_shapes() {
        let p2wpkh = Witness::from_slice(&[
            Vec::from(&[0x30u8; 72][..]),
            {
                let mut key = vec![0x03u8];
                key.extend_from_slice(&[0x11; 32]);
                key
            },
        ]);
        assert!(is_p2wpkh_witness(&p2wpkh));
        assert!(!is_single_key_p2tr_witness(&p2wpkh));

        let uncompressed = Witness::from_slice(&[vec![0x30u8; 72], vec![0x04u8; 65]]);
        assert!(!is_p2wpkh_witness(&uncompressed));

        let p2wsh = Witness::from_slice(&[
            vec![0x30u8; 72],
            vec![0x21u8; 35],
        ]);
        assert!(!is_p2wpkh_witness(&p2wsh));

        let taproot = Witness::from_slice(&[vec![0xf4u8; 64]]);
        assert!(is_single_key_p2tr_witness(&taproot));
        assert!(!is_p2wpkh_witness(&taproot));

        assert!(!is_single_key_p2tr_witness(&Witness::new()));
    }
}
