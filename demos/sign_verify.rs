use anyhow::anyhow;
use bdk_wallet::{keys::DescriptorSecretKey, KeychainKind, Wallet};
use bip322_liquid::{
    Address, AddressParams, AddressType, Network as MessageNetwork, Signer, Verifier,
};
use bitcoin::{key::Secp256k1, Network, PrivateKey};

const NETWORK: Network = Network::Signet;
const EXTERNAL_DESC: &str = "wpkh(tprv8ZgxMBicQKsPdy6LMhUtFHAgpocR8GC6QmwMSFpZs7h6Eziw3SpThFfczTDh5rW2krkqffa11UpX3XkeTTB2FvzZKWXqPY54Y6Rq4AQ5R8L/84'/1'/0'/0/*)";
const INTERNAL_DESC: &str = "wpkh(tprv8ZgxMBicQKsPdy6LMhUtFHAgpocR8GC6QmwMSFpZs7h6Eziw3SpThFfczTDh5rW2krkqffa11UpX3XkeTTB2FvzZKWXqPY54Y6Rq4AQ5R8L/84'/1'/0'/1/*)";

fn main() -> Result<(), anyhow::Error> {
    let wallet = Wallet::create(EXTERNAL_DESC, INTERNAL_DESC)
        .network(NETWORK)
        .create_wallet_no_persist()?;

    let private_key = wallet
        .get_signers(KeychainKind::External)
        .signers()
        .iter()
        .filter_map(|signer| signer.descriptor_secret_key())
        .find_map(|descriptor_secret| {
            if let DescriptorSecretKey::XPrv(single_priv) = descriptor_secret {
                Some(PrivateKey::new(single_priv.xkey.private_key, NETWORK))
            } else {
                None
            }
        })
        .ok_or_else(|| anyhow!("wallet holds no extended private key"))?;

    let secp = Secp256k1::new();
    let public_key = private_key.public_key(&secp);
    let private_key_wif = private_key.to_wif();
    let message = "HELLO WORLD";

    for (address_type, params) in [
        (AddressType::P2wpkh, &AddressParams::BITCOIN_TESTNET),
        (AddressType::P2pkh, &AddressParams::BITCOIN_TESTNET),
        (AddressType::P2wpkh, &AddressParams::LIQUID_TESTNET),
        (AddressType::P2pkh, &AddressParams::LIQUID_TESTNET),
    ] {
        let address = Address::from_public_key(&public_key, address_type, params)?.to_string();

        let signature =
            Signer::sign(&private_key_wif, &address, message, MessageNetwork::Testnet)?;
        let verify = Verifier::verify_signature(&address, message, &signature)?;
        println!("{:?} {}: {}", address_type, address, signature);

        assert!(verify);
        assert!(!Verifier::verify_signature(&address, "hello world", &signature)?);
    }

    // a legacy signature also proves the nested segwit address of its key
    let nested = Address::from_public_key(
        &public_key,
        AddressType::P2sh,
        &AddressParams::BITCOIN_TESTNET,
    )?
    .to_string();
    let legacy = Address::from_public_key(
        &public_key,
        AddressType::P2pkh,
        &AddressParams::BITCOIN_TESTNET,
    )?
    .to_string();
    let signature = Signer::sign(&private_key_wif, &legacy, message, MessageNetwork::Testnet)?;
    assert!(Verifier::verify_signature(&nested, message, &signature)?);

    Ok(())
}
