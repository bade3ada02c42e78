use super::{extraction_err, parse_wif_lines, read_text, KeyExtractor, WalletFormat};
use crate::Result;
use bitcoin::PrivateKey;
use log::debug;
use std::path::Path;

const SQLITE_MAGIC: &str = "SQLite format 3\u{0}";

/// Bitcoin Core `dumpwallet` output:
/// `<WIF> <timestamp> label=<label> # addr=<address>`
pub struct DumpWalletExtractor;

impl KeyExtractor for DumpWalletExtractor {
    fn extract(&self, path: &Path, passphrase: Option<&str>) -> Result<Vec<PrivateKey>> {
        let content = read_text(path, WalletFormat::Bitcoin)?;
        if content.starts_with(SQLITE_MAGIC) {
            return Err(extraction_err(
                WalletFormat::Bitcoin,
                "sqlite wallet is not supported, export it with `bitcoin-cli dumpwallet`",
            ));
        }
        if passphrase.is_some() {
            debug!("dumpwallet output is never encrypted, ignoring passphrase");
        }
        parse_wif_lines(&content, WalletFormat::Bitcoin)
    }
}
