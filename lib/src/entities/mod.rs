pub mod identifier;
pub mod persisted;

use crate::{DaemonOpts, Result};
use bitcoin::{Address, PublicKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::TryInto;

pub use identifier::*;
pub use persisted::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportOutput {
    pub account_name: String,
    /// number of keys found in the source, all of them admitted
    pub count: usize,
    /// file name of the imported wallet, `None` for identity imports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub addresses: Vec<Address>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ListedKey {
    pub account: String,
    pub public_key: PublicKey,
    pub address: Address,
    pub is_identity: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ListOutput {
    pub keys: Vec<ListedKey>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RescanOutput {
    pub start_from: usize,
    pub stop_height: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorJson {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "t", content = "c", rename_all = "lowercase")]
pub enum StringEncoding {
    Base64(String),
    Hex(String),
    Plain(String),
}

impl StringEncoding {
    pub fn new_base64(content: &[u8]) -> Self {
        StringEncoding::Base64(base64::encode(content))
    }

    pub fn new_hex(content: &[u8]) -> Self {
        StringEncoding::Hex(hex::encode(content))
    }

    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        Ok(match self {
            StringEncoding::Base64(s) => base64::decode(s)?,
            StringEncoding::Hex(s) => hex::decode(s)?,
            StringEncoding::Plain(s) => s.as_bytes().to_vec(),
        })
    }

    pub fn get_exactly_32(&self) -> Result<[u8; 32]> {
        let bytes = self.as_bytes()?;
        if bytes.len() != 32 {
            return Err(crate::Error::EncryptionKeyNot32Bytes(bytes.len()));
        }
        let mut result = [0u8; 32];
        result.copy_from_slice(&bytes[..]);
        Ok(result)
    }
}

impl From<&WalletKey> for ListedKey {
    fn from(key: &WalletKey) -> Self {
        ListedKey {
            account: key.account.clone(),
            public_key: key.public_key,
            address: key.address.clone(),
            is_identity: key.is_identity,
        }
    }
}

macro_rules! impl_try_into {
    ( $for:ty ) => {
        impl TryInto<Value> for $for {
            type Error = crate::Error;

            fn try_into(self) -> std::result::Result<Value, Self::Error> {
                Ok(serde_json::to_value(self)?)
            }
        }
    };
}

impl_try_into!(ImportOutput);
impl_try_into!(ListOutput);
impl_try_into!(RescanOutput);
impl_try_into!(DaemonOpts);
impl_try_into!(WalletInfo);

macro_rules! impl_traits {
    ( $for:ty, $val:expr, $k:expr  ) => {
        impl Identifiable for $for {
            fn id(&self) -> &Identifier {
                &self.id
            }
        }
        impl Overwritable for $for {
            fn can_overwrite() -> bool {
                $val
            }
        }
        impl WhichKind for $for {
            fn kind() -> Kind {
                $k
            }
        }
    };
}

impl_traits!(WalletInfo, false, Kind::WalletInfo);
impl_traits!(WalletKey, false, Kind::WalletKey);
impl_traits!(ScanRequest, true, Kind::ScanRequest);

#[cfg(test)]
mod tests {
    use crate::{Error, StringEncoding};

    #[test]
    fn test_string_encoding() {
        let bytes = [3u8; 32];
        let base64 = StringEncoding::new_base64(&bytes);
        assert_eq!(base64.get_exactly_32().unwrap(), bytes);
        let hex = StringEncoding::new_hex(&bytes[..31]);
        assert_matches!(hex.get_exactly_32(), Err(Error::EncryptionKeyNot32Bytes(31)));
        let plain = StringEncoding::Plain("abc".to_string());
        assert_eq!(plain.as_bytes().unwrap(), b"abc".to_vec());
    }
}
