//! Extraction of private keys from foreign wallet files and identity profiles.
//!
//! Every extractor materializes the whole batch in memory, in file order.

use crate::{Error, Result};
use bitcoin::{Network, PrivateKey};
use core::fmt::Formatter;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::{fs, io};

pub mod armory;
pub mod bitcoin_core;
pub mod electrum;
pub mod keyhotee;
pub mod multibit;

pub use keyhotee::Profile;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum WalletFormat {
    Bitcoin,
    MultiBit,
    Electrum,
    Armory,
}

impl Display for WalletFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WalletFormat::Bitcoin => "bitcoin",
            WalletFormat::MultiBit => "multibit",
            WalletFormat::Electrum => "electrum",
            WalletFormat::Armory => "armory",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for WalletFormat {
    type Err = io::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "bitcoin" => Ok(WalletFormat::Bitcoin),
            "multibit" => Ok(WalletFormat::MultiBit),
            "electrum" => Ok(WalletFormat::Electrum),
            "armory" => Ok(WalletFormat::Armory),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("({}) valid values are: bitcoin, multibit, electrum, armory", s),
            )),
        }
    }
}

pub trait KeyExtractor {
    /// An absent passphrase means the file is expected unencrypted
    fn extract(&self, path: &Path, passphrase: Option<&str>) -> Result<Vec<PrivateKey>>;
}

pub trait IdentityDeriver {
    fn derive(&self, profile: &Profile, handle: &str) -> Result<PrivateKey>;
}

/// One extractor per wallet format plus the identity deriver
pub struct KeySources {
    pub bitcoin: Box<dyn KeyExtractor>,
    pub multibit: Box<dyn KeyExtractor>,
    pub electrum: Box<dyn KeyExtractor>,
    pub armory: Box<dyn KeyExtractor>,
    pub identity: Box<dyn IdentityDeriver>,
}

impl KeySources {
    pub fn new(network: Network) -> Self {
        KeySources {
            bitcoin: Box::new(bitcoin_core::DumpWalletExtractor),
            multibit: Box::new(multibit::KeyExportExtractor),
            electrum: Box::new(electrum::ElectrumExtractor),
            armory: Box::new(armory::KeyListExtractor { network }),
            identity: Box::new(keyhotee::KeyhoteeDeriver { network }),
        }
    }

    pub fn extractor(&self, format: WalletFormat) -> &dyn KeyExtractor {
        match format {
            WalletFormat::Bitcoin => self.bitcoin.as_ref(),
            WalletFormat::MultiBit => self.multibit.as_ref(),
            WalletFormat::Electrum => self.electrum.as_ref(),
            WalletFormat::Armory => self.armory.as_ref(),
        }
    }
}

pub(crate) fn extraction_err(format: WalletFormat, msg: &str) -> Error {
    Error::Extraction(format!("{}: {}", format, msg))
}

pub(crate) fn read_text(path: &Path, format: WalletFormat) -> Result<String> {
    debug!("reading {} wallet {:?}", format, path);
    let bytes = fs::read(path)
        .map_err(|e| extraction_err(format, &format!("cannot read {}: {}", path.display(), e)))?;
    String::from_utf8(bytes)
        .map_err(|_| extraction_err(format, "binary file found, expected a text export"))
}

pub(crate) fn parse_wif(wif: &str, format: WalletFormat, line: usize) -> Result<PrivateKey> {
    PrivateKey::from_wif(wif)
        .map_err(|e| extraction_err(format, &format!("invalid key at line {}: {}", line, e)))
}

/// `<WIF> <anything>` lines, `#` comments and blank lines skipped
pub(crate) fn parse_wif_lines(content: &str, format: WalletFormat) -> Result<Vec<PrivateKey>> {
    let mut keys = vec![];
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let wif = line.split_whitespace().next().unwrap_or_default();
        keys.push(parse_wif(wif, format, i + 1)?);
    }
    Ok(keys)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use bitcoin::secp256k1::SecretKey;

    pub fn key(n: u8, compressed: bool) -> PrivateKey {
        PrivateKey {
            compressed,
            network: Network::Bitcoin,
            key: SecretKey::from_slice(&[n; 32]).unwrap(),
        }
    }

    #[test]
    fn test_wallet_format() {
        for format in &[
            WalletFormat::Bitcoin,
            WalletFormat::MultiBit,
            WalletFormat::Electrum,
            WalletFormat::Armory,
        ] {
            assert_eq!(
                WalletFormat::from_str(&format.to_string()).unwrap(),
                *format
            );
        }
        assert!(WalletFormat::from_str("wallet.dat").is_err());
        assert_eq!(
            serde_json::to_string(&WalletFormat::MultiBit).unwrap(),
            "\"multibit\""
        );
    }

    #[test]
    fn test_parse_wif_lines() {
        let content = format!(
            "# header\n\n  {} 2014-01-01T00:00:00Z\n{}\n",
            key(1, true).to_wif(),
            key(2, false).to_wif()
        );
        let keys = parse_wif_lines(&content, WalletFormat::MultiBit).unwrap();
        assert_eq!(keys, vec![key(1, true), key(2, false)]);

        let err = parse_wif_lines("# ok\nnot-a-key 0\n", WalletFormat::Bitcoin).unwrap_err();
        assert_matches!(err, Error::Extraction(ref msg) if msg.contains("line 2"));
    }
}
