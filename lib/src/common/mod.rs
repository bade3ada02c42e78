use crate::*;
use bitcoin::Network;
use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::Write;

pub mod context;
pub mod encryption;
pub mod error;
pub mod list;

static LOGGER: SimpleLogger<'static> = SimpleLogger {
    path: "importa.log",
};

/// Appends log lines to `path`, lines that cannot be written are dropped
pub struct SimpleLogger<'a> {
    path: &'a str,
}

impl SimpleLogger<'_> {
    fn append(&self, line: &str) -> std::io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path)?;
        let mut stream = BufWriter::new(file);
        stream.write_all(line.as_bytes())?;
        stream.flush()
    }
}

impl log::Log for SimpleLogger<'_> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = self.append(&format!("{} - {}\n", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

pub fn init_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

/// Test networks share the same key encoding, so a testnet key is fine in a regtest wallet
pub fn check_compatibility(wallet: Network, key: Network) -> Result<()> {
    match (wallet, key) {
        (Network::Bitcoin, Network::Bitcoin) => Ok(()),
        (Network::Bitcoin, _) | (_, Network::Bitcoin) => {
            Err(Error::IncompatibleNetwork { wallet, key })
        }
        _ => Ok(()),
    }
}

/// Turns a `{"error": ...}` value, as printed by the cli, back into an error
pub fn map_json_error(result: Result<serde_json::Value>) -> Result<serde_json::Value> {
    match result {
        Ok(value) => match value.get("error") {
            Some(serde_json::Value::String(e)) => Err(Error::Generic(e.to_string())),
            _ => Ok(value),
        },
        Err(e) => Err(Error::Generic(e.to_string())),
    }
}
