use crate::ErrorJson;
use bitcoin::{BlockHash, Network};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Generic(String),

    // Import taxonomy
    InvalidName(String),
    WalletNotOpen,
    WalletLocked,
    Extraction(String),
    KeyImport(String),
    KeyAlreadyImported { account: String },
    Scan(String),
    Context {
        message: String,
        context: Vec<(String, String)>,
        source: Box<Error>,
    },

    // Internal
    CannotOverwrite(PathBuf),
    FileNotFoundOrCorrupt(PathBuf, String),
    MissingEncryptionKey,
    EncryptionKeyNot32Bytes(usize),
    WrongEncryptionKey,
    IncompatibleNetwork { wallet: Network, key: Network },
    MaybeEncryptedWrongState,
    MissingRescanUpTo,
    CannotRetrieveHomeDir,
    IncompatibleGenesis { node: BlockHash, expected: BlockHash },

    // External
    BitcoinRpc(bitcoincore_rpc::Error),
    BitcoinKey(bitcoin::util::key::Error),
    BitcoinSecp256k1(bitcoin::secp256k1::Error),
    Bip32(bitcoin::util::bip32::Error),
    Serde(serde_json::error::Error),
    IO(std::io::Error),
    Base64(base64::DecodeError),
    Hex(hex::FromHexError),
    PathStrip(std::path::StripPrefixError),
    Aead(aes_gcm_siv::aead::Error),
}

macro_rules! impl_error {
    ( $from:ty, $to:ident ) => {
        impl std::convert::From<$from> for Error {
            fn from(err: $from) -> Self {
                Error::$to(err)
            }
        }
    };
}

impl_error!(bitcoincore_rpc::Error, BitcoinRpc);
impl_error!(bitcoin::util::key::Error, BitcoinKey);
impl_error!(bitcoin::secp256k1::Error, BitcoinSecp256k1);
impl_error!(bitcoin::util::bip32::Error, Bip32);
impl_error!(serde_json::error::Error, Serde);
impl_error!(std::io::Error, IO);
impl_error!(base64::DecodeError, Base64);
impl_error!(hex::FromHexError, Hex);
impl_error!(std::path::StripPrefixError, PathStrip);
impl_error!(aes_gcm_siv::aead::Error, Aead);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Generic(e) => write!(f, "{}", e),

            Error::InvalidName(name) => write!(f, "Invalid account name: {}", name),
            Error::WalletNotOpen => write!(f, "wallet is not open"),
            Error::WalletLocked => write!(f, "wallet is locked"),
            Error::Extraction(e) => write!(f, "key extraction failed: {}", e),
            Error::KeyImport(e) => write!(f, "key import failed: {}", e),
            Error::KeyAlreadyImported { account } => {
                write!(f, "key already imported under account {}", account)
            }
            Error::Scan(e) => write!(f, "chain scan failed: {}", e),
            Error::Context {
                message,
                context,
                source,
            } => {
                let pairs: Vec<String> = context
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{} ({}): {}", message, pairs.join(", "), source)
            }

            Error::CannotOverwrite(p) => write!(f, "Cannot overwrite {}", p.display()),
            Error::FileNotFoundOrCorrupt(p, e) => {
                write!(f, "file {} not found or corrupt: {}", p.display(), e)
            }
            Error::MissingEncryptionKey => write!(f, "encryption key is required, use --read-stdin"),
            Error::EncryptionKeyNot32Bytes(n) => {
                write!(f, "encryption key must be 32 bytes, got {}", n)
            }
            Error::WrongEncryptionKey => write!(f, "encryption key does not unlock the wallet"),
            Error::IncompatibleNetwork { wallet, key } => write!(
                f,
                "key network {} is not compatible with wallet network {}",
                key, wallet
            ),
            Error::MaybeEncryptedWrongState => write!(f, "encrypted content in the wrong state"),
            Error::MissingRescanUpTo => write!(f, "rescan did not report the stop height"),
            Error::CannotRetrieveHomeDir => write!(f, "cannot retrieve home dir"),
            Error::IncompatibleGenesis { node, expected } => write!(
                f,
                "node genesis {} does not match network genesis {}",
                node, expected
            ),

            Error::BitcoinRpc(e) => write!(f, "{}", e),
            Error::BitcoinKey(e) => write!(f, "{}", e),
            Error::BitcoinSecp256k1(e) => write!(f, "{}", e),
            Error::Bip32(e) => write!(f, "{}", e),
            Error::Serde(e) => write!(f, "{}", e),
            Error::IO(e) => write!(f, "{}", e),
            Error::Base64(e) => write!(f, "{}", e),
            Error::Hex(e) => write!(f, "{}", e),
            Error::PathStrip(e) => write!(f, "{}", e),
            Error::Aead(e) => write!(f, "{:?}", e),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Wrap `self` with a message and ordered key/value diagnostics
    pub fn context(self, message: &str, context: Vec<(&str, String)>) -> Error {
        Error::Context {
            message: message.to_string(),
            context: context
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            source: Box::new(self),
        }
    }

    /// The original failure, without any context layer
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            e => e,
        }
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        match self {
            Error::Context {
                context, source, ..
            } => context
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .or_else(|| source.context_value(key)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        let value = ErrorJson {
            error: self.to_string(),
        };
        serde_json::to_value(&value).unwrap() // safe to unwrap, ErrorJson does not contain map with non string keys
    }
}
