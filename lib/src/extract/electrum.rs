use super::{extraction_err, read_text, KeyExtractor, WalletFormat};
use crate::Result;
use bitcoin::PrivateKey;
use serde_json::{Map, Value};
use std::path::Path;

/// Electrum wallet file with imported keys.
///
/// Keys are returned in file order. They are looked up in `keystore.keypairs` (electrum 3+), then `keypairs`
/// and `imported_keys` (electrum 1.x, 2.x), each one a `pubkey -> WIF` map.
pub struct ElectrumExtractor;

impl KeyExtractor for ElectrumExtractor {
    fn extract(&self, path: &Path, _passphrase: Option<&str>) -> Result<Vec<PrivateKey>> {
        let content = read_text(path, WalletFormat::Electrum)?;
        let wallet: Value = serde_json::from_str(&content)
            .map_err(|e| extraction_err(WalletFormat::Electrum, &format!("invalid json: {}", e)))?;

        if wallet.get("use_encryption").and_then(Value::as_bool) == Some(true) {
            return Err(extraction_err(
                WalletFormat::Electrum,
                "encrypted wallets are not supported, disable the password in electrum",
            ));
        }

        let pairs = keypairs(&wallet).ok_or_else(|| {
            extraction_err(WalletFormat::Electrum, "wallet does not contain imported keys")
        })?;

        let mut keys = Vec::with_capacity(pairs.len());
        for (pubkey, value) in pairs.iter() {
            let wif = value.as_str().ok_or_else(|| {
                extraction_err(
                    WalletFormat::Electrum,
                    &format!("secret of {} is not a string", pubkey),
                )
            })?;
            let wif = wif.strip_prefix("p2pkh:").unwrap_or(wif);
            let key = PrivateKey::from_wif(wif).map_err(|e| {
                extraction_err(
                    WalletFormat::Electrum,
                    &format!("invalid key for {}: {}", pubkey, e),
                )
            })?;
            keys.push(key);
        }
        Ok(keys)
    }
}

fn keypairs(wallet: &Value) -> Option<&Map<String, Value>> {
    wallet
        .pointer("/keystore/keypairs")
        .or_else(|| wallet.get("keypairs"))
        .or_else(|| wallet.get("imported_keys"))
        .and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::ElectrumExtractor;
    use crate::extract::tests::key;
    use crate::extract::KeyExtractor;
    use crate::Error;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(temp_dir: &TempDir, value: &serde_json::Value) -> std::path::PathBuf {
        let path = temp_dir.path().join("default_wallet");
        std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_keystore_keypairs() {
        let temp_dir = TempDir::new().unwrap();
        let value = json!({
            "seed_version": 18,
            "use_encryption": false,
            "wallet_type": "imported",
            "keystore": {
                "type": "imported",
                "keypairs": {
                    "03ff": key(5, true).to_wif(),
                    "02aa": format!("p2pkh:{}", key(6, true).to_wif()),
                }
            }
        });
        let path = write(&temp_dir, &value);
        let keys = ElectrumExtractor.extract(&path, None).unwrap();
        assert_eq!(keys, vec![key(5, true), key(6, true)]);
    }

    #[test]
    fn test_legacy_imported_keys() {
        let temp_dir = TempDir::new().unwrap();
        let value = json!({
            "seed_version": 4,
            "imported_keys": { "1Addr": key(7, false).to_wif() }
        });
        let path = write(&temp_dir, &value);
        assert_eq!(
            ElectrumExtractor.extract(&path, None).unwrap(),
            vec![key(7, false)]
        );
    }

    #[test]
    fn test_electrum_errors() {
        let temp_dir = TempDir::new().unwrap();

        let path = write(
            &temp_dir,
            &json!({"use_encryption": true, "keystore": {"keypairs": {}}}),
        );
        let err = ElectrumExtractor.extract(&path, Some("pass")).unwrap_err();
        assert_matches!(err, Error::Extraction(ref msg) if msg.contains("encrypted"));

        let path = write(&temp_dir, &json!({"wallet_type": "standard"}));
        assert_matches!(
            ElectrumExtractor.extract(&path, None),
            Err(Error::Extraction(_))
        );

        let path = write(&temp_dir, &json!({"keypairs": {"02aa": "notakey"}}));
        let err = ElectrumExtractor.extract(&path, None).unwrap_err();
        assert_matches!(err, Error::Extraction(ref msg) if msg.contains("invalid key for 02aa"));

        let path = temp_dir.path().join("garbage");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ElectrumExtractor.extract(&path, None).unwrap_err();
        assert_matches!(err, Error::Extraction(ref msg) if msg.contains("invalid json"));
    }
}
