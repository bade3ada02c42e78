use super::{extraction_err, parse_wif_lines, read_text, KeyExtractor, WalletFormat};
use crate::Result;
use bitcoin::PrivateKey;
use std::path::Path;

/// base64 of `Salted__`, the openssl header of password protected exports
const ENCRYPTED_PREFIX: &str = "U2FsdGVkX1";

/// MultiBit `.key` export, one `<WIF> <ISO-8601 timestamp>` per line
pub struct KeyExportExtractor;

impl KeyExtractor for KeyExportExtractor {
    fn extract(&self, path: &Path, _passphrase: Option<&str>) -> Result<Vec<PrivateKey>> {
        let content = read_text(path, WalletFormat::MultiBit)?;
        if content.trim_start().starts_with(ENCRYPTED_PREFIX) {
            return Err(extraction_err(
                WalletFormat::MultiBit,
                "encrypted exports are not supported, export the keys without password",
            ));
        }
        parse_wif_lines(&content, WalletFormat::MultiBit)
    }
}

#[cfg(test)]
mod tests {
    use super::KeyExportExtractor;
    use crate::extract::tests::key;
    use crate::extract::KeyExtractor;
    use crate::Error;
    use tempfile::TempDir;

    #[test]
    fn test_key_export() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("multibit.key");
        let content = format!(
            "# KEEP YOUR PRIVATE KEYS SAFE !\n\
             # Anyone who can read this file can spend your bitcoin.\n\
             #\n\
             # Format:\n\
             #   <Base58 encoded private key>[<whitespace>[<key createdAt>]]\n\
             #\n\
             {} 2014-03-01T12:51:34Z\n\
             {}\n\
             # End of private keys\n",
            key(3, false).to_wif(),
            key(4, true).to_wif()
        );
        std::fs::write(&path, content).unwrap();
        let keys = KeyExportExtractor.extract(&path, None).unwrap();
        assert_eq!(keys, vec![key(3, false), key(4, true)]);

        let empty = temp_dir.path().join("empty.key");
        std::fs::write(&empty, "# End of private keys\n").unwrap();
        assert!(KeyExportExtractor.extract(&empty, None).unwrap().is_empty());
    }

    #[test]
    fn test_encrypted_export_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("multibit.key");
        std::fs::write(&path, "U2FsdGVkX19QU3xq1ZxC8G3bGUuAxqHY\n").unwrap();
        let err = KeyExportExtractor.extract(&path, Some("secret")).unwrap_err();
        assert_matches!(err, Error::Extraction(ref msg) if msg.contains("encrypted"));
    }
}
