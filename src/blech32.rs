//! Blech32, the checksum Elements uses for confidential segwit addresses.
//!
//! It is bech32 with a 12 character checksum, wide enough to cover the
//! 33-byte blinding key carried in front of the witness program.

use alloc::{string::String, vec::Vec};

use bitcoin::bech32::{
    primitives::decode::CheckedHrpstring, ByteIterExt, Checksum, Fe32, Fe32IterExt, Hrp,
};

use crate::Error;

/// The blech32 checksum algorithm.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Blech32 {}

impl Checksum for Blech32 {
    type MidstateRepr = u64;
    const CODE_LENGTH: usize = 1024;
    const CHECKSUM_LENGTH: usize = 12;
    const GENERATOR_SH: [u64; 5] = [
        0x7d52fba40bd886,
        0x5e8dbf1a03950c,
        0x1c3a3c74072a18,
        0x385d72fa0e5139,
        0x7093e5a608865b,
    ];
    const TARGET_RESIDUE: u64 = 1;
}

/// Encodes `data` behind `witness_version` with the blech32 checksum.
pub fn encode(hrp: &Hrp, witness_version: Fe32, data: &[u8]) -> String {
    data.iter()
        .copied()
        .bytes_to_fes()
        .with_checksum::<Blech32>(hrp)
        .with_witness_version(witness_version)
        .chars()
        .collect()
}

/// Decodes a blech32 string into its hrp, witness version and payload bytes.
pub fn decode(s: &str) -> Result<(Hrp, Fe32, Vec<u8>), Error> {
    let checked = CheckedHrpstring::new::<Blech32>(s)
        .map_err(|e| Error::InvalidAddress(format!("{}", e)))?;

    let mut fes = checked
        .data_part_ascii_no_checksum()
        .iter()
        .map(|&c| Fe32::from_char(char::from(c)));
    let witness_version = fes
        .next()
        .ok_or_else(|| Error::InvalidAddress("missing witness version".into()))?
        .map_err(|e| Error::InvalidAddress(format!("{}", e)))?;
    let data = fes
        .collect::<Result<Vec<Fe32>, _>>()
        .map_err(|e| Error::InvalidAddress(format!("{}", e)))?
        .into_iter()
        .fes_to_bytes()
        .collect();

    Ok((checked.hrp(), witness_version, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIQUID_CONFIDENTIAL: &str = "lq1qqf8er278e6nyvuwtgf39e6ewvdcnjupn9a86rzpx655y5lhkt0walu3djf9cklkxd3ryld97hu8h3xepw7sh2rlu7q45dcew5";

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_decode_liquid_address() {
        let (hrp, version, data) = decode(LIQUID_CONFIDENTIAL).unwrap();

        assert_eq!(hrp.as_str(), "lq");
        assert_eq!(version, Fe32::Q);
        assert_eq!(data.len(), 53);
        assert_eq!(
            hex(&data[..33]),
            "024f91abc7cea64671cb42625ceb2e63713970332f4fa18826d5284a7ef65bdddf"
        );
        assert_eq!(hex(&data[33..]), "f22d924b8b7ec66c464fb4bebf0f789b2177a175");
    }

    #[test]
    fn test_encode_matches_decoded() {
        let (hrp, version, data) = decode(LIQUID_CONFIDENTIAL).unwrap();
        assert_eq!(encode(&hrp, version, &data), LIQUID_CONFIDENTIAL);
    }

    #[test]
    fn test_decode_accepts_uppercase() {
        let upper = LIQUID_CONFIDENTIAL.to_uppercase();
        let (_, _, data) = decode(&upper).unwrap();
        assert_eq!(data.len(), 53);
    }

    #[test]
    fn test_bad_checksum() {
        let mut corrupted = String::from(LIQUID_CONFIDENTIAL);
        corrupted.pop();
        corrupted.push('q');
        assert!(matches!(decode(&corrupted), Err(Error::InvalidAddress(_))));

        // a valid bech32 string is not valid blech32
        assert!(decode("ex1q7gkeyjut0mrxc3j0kjlt7rmcnvsh0gt45d3fud").is_err());
    }
}
