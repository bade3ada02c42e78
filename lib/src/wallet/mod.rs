//! Wallet persisted as json files under `<datadir>/<network>/<wallet_name>/`

use crate::common::encryption::EncryptionKey;
use crate::import::{KeyOutcome, KeyStore};
use crate::*;
use bitcoin::secp256k1::Secp256k1;
use bitcoin::PrivateKey;
use log::{debug, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct FileWallet {
    context: Context,
    info: Option<WalletInfo>,
    key: Option<EncryptionKey>,
}

impl FileWallet {
    /// Opens the wallet named in `context` if it exists, and unlocks it when the context carries
    /// the encryption key. A key that does not unlock the wallet leaves it open but locked.
    pub fn open(context: Context) -> Result<Self> {
        let id = context.id(Kind::WalletInfo, &context.wallet_name);
        let info = if id.exists(&context.datadir)? {
            Some(id.read::<WalletInfo, _>(&context.datadir)?)
        } else {
            debug!("wallet {} does not exist", context.wallet_name);
            None
        };
        let key = context.encryption_key().unwrap_or_else(|e| {
            warn!("ignoring encryption key: {}", e);
            None
        });
        let mut wallet = FileWallet {
            context,
            info,
            key: None,
        };
        if let (Some(key), true) = (key, wallet.info.is_some()) {
            if let Err(e) = wallet.unlock(key) {
                warn!("wallet {} stays locked: {}", wallet.context.wallet_name, e);
            }
        }
        Ok(wallet)
    }

    pub fn unlock(&mut self, key: EncryptionKey) -> Result<()> {
        let info = self.info.as_ref().ok_or(Error::WalletNotOpen)?;
        info.verify_key(&key)?;
        self.key = Some(key);
        Ok(())
    }

    pub fn lock(&mut self) {
        self.key = None;
    }
}

impl KeyStore for FileWallet {
    fn is_open(&self) -> bool {
        self.info.is_some()
    }

    fn is_unlocked(&self) -> bool {
        self.key.is_some()
    }

    fn import_private_key(
        &mut self,
        key: &PrivateKey,
        account_name: &str,
        is_identity: bool,
    ) -> Result<KeyOutcome> {
        if self.info.is_none() {
            return Err(Error::WalletNotOpen);
        }
        let encryption_key = self.key.ok_or(Error::WalletLocked)?;
        check_compatibility(self.context.network, key.network)?;

        let secp = Secp256k1::signing_only();
        let name = WalletKey::key_id(&key.public_key(&secp));
        let id = self.context.id(Kind::WalletKey, &name);
        if id.exists(&self.context.datadir)? {
            let existing: WalletKey = id.read(&self.context.datadir)?;
            if existing.account != account_name {
                return Err(Error::KeyAlreadyImported {
                    account: existing.account,
                });
            }
            debug!("key {} already in account {}", existing.address, account_name);
            return Ok(KeyOutcome::AlreadyPresent(existing));
        }

        let record = WalletKey::new(
            self.context.network,
            &self.context.wallet_name,
            key,
            account_name,
            is_identity,
            &encryption_key,
        )?;
        self.context
            .write(&record)
            .map_err(|e| Error::KeyImport(e.to_string()))?;
        Ok(KeyOutcome::Created(record))
    }
}

impl Context {
    pub fn create_wallet(&self) -> Result<WalletInfo> {
        let key = self.encryption_key()?.ok_or(Error::MissingEncryptionKey)?;
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let info = WalletInfo::new(self.network, &self.wallet_name, created_at, &key)?;
        self.write(&info)?;
        info!("created wallet {} on {}", self.wallet_name, self.network);
        Ok(info)
    }
}
