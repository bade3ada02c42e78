use crate::common::encryption::{EncryptionKey, MaybeEncrypted};
use crate::{Error, Identifier, Kind, Result};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::{Address, Network, PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

pub const CANARY: &str = "importa";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WalletInfo {
    pub id: Identifier,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// [CANARY] encrypted with the wallet key, used to verify the key on unlock
    pub canary: MaybeEncrypted<String>,
}

/// A private key admitted in the wallet under an account
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WalletKey {
    /// name is the hash160 of the public key
    pub id: Identifier,
    pub account: String,
    pub public_key: PublicKey,
    pub address: Address,
    pub is_identity: bool,
    /// WIF of the private key
    pub secret: MaybeEncrypted<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScanRequest {
    pub id: Identifier,
    pub start_height: u32,
    pub count: u32,
}

impl WalletInfo {
    pub fn new(network: Network, wallet: &str, created_at: u64, key: &EncryptionKey) -> Result<Self> {
        Ok(WalletInfo {
            id: Identifier::new(network, wallet, Kind::WalletInfo, wallet),
            created_at,
            canary: MaybeEncrypted::plain(CANARY.to_string()).encrypt(key)?,
        })
    }

    pub fn verify_key(&self, key: &EncryptionKey) -> Result<()> {
        match self.canary.clone().into_plain(key) {
            Ok(value) if value == CANARY => Ok(()),
            _ => Err(Error::WrongEncryptionKey),
        }
    }
}

impl WalletKey {
    pub fn key_id(public_key: &PublicKey) -> String {
        public_key.pubkey_hash().to_string()
    }

    pub fn new(
        network: Network,
        wallet: &str,
        private_key: &PrivateKey,
        account: &str,
        is_identity: bool,
        encryption_key: &EncryptionKey,
    ) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        let public_key = private_key.public_key(&secp);
        let address = Address::p2pkh(&public_key, network);
        let id = Identifier::new(network, wallet, Kind::WalletKey, &Self::key_id(&public_key));
        Ok(WalletKey {
            id,
            account: account.to_string(),
            public_key,
            address,
            is_identity,
            secret: MaybeEncrypted::plain(private_key.to_wif()).encrypt(encryption_key)?,
        })
    }

    pub fn private_key(&self, encryption_key: &EncryptionKey) -> Result<PrivateKey> {
        let wif = self.secret.clone().into_plain(encryption_key)?;
        Ok(PrivateKey::from_wif(&wif)?)
    }
}
