use super::{extraction_err, parse_wif, read_text, KeyExtractor, WalletFormat};
use crate::Result;
use bitcoin::secp256k1::SecretKey;
use bitcoin::{Network, PrivateKey};
use log::debug;
use std::path::Path;

const BASE58_TAG: &str = "PrivBase58:";
const HEX_TAG: &str = "PrivHexBE:";

/// Armory "Export Key Lists" text file.
///
/// Each address section may carry the secret twice, as `PrivBase58:` and as
/// `PrivHexBE:`, only the first occurrence of a secret is kept.
pub struct KeyListExtractor {
    pub network: Network,
}

impl KeyListExtractor {
    fn parse_hex(&self, hex_str: &str, line: usize) -> Result<PrivateKey> {
        let compact: String = hex_str.split_whitespace().collect();
        let bytes = hex::decode(&compact).map_err(|e| {
            extraction_err(
                WalletFormat::Armory,
                &format!("invalid hex key at line {}: {}", line, e),
            )
        })?;
        let key = SecretKey::from_slice(&bytes).map_err(|e| {
            extraction_err(
                WalletFormat::Armory,
                &format!("invalid hex key at line {}: {}", line, e),
            )
        })?;
        Ok(PrivateKey {
            compressed: false,
            network: self.network,
            key,
        })
    }
}

impl KeyExtractor for KeyListExtractor {
    fn extract(&self, path: &Path, _passphrase: Option<&str>) -> Result<Vec<PrivateKey>> {
        let content = read_text(path, WalletFormat::Armory)?;
        let mut keys: Vec<PrivateKey> = vec![];
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            let key = if let Some(wif) = line.strip_prefix(BASE58_TAG) {
                parse_wif(wif.trim(), WalletFormat::Armory, i + 1)?
            } else if let Some(hex_str) = line.strip_prefix(HEX_TAG) {
                self.parse_hex(hex_str, i + 1)?
            } else {
                continue;
            };
            if keys.iter().any(|k| k.key == key.key) {
                debug!("skipping duplicate secret at line {}", i + 1);
                continue;
            }
            keys.push(key);
        }
        Ok(keys)
    }
}
