use crate::extract::{KeySources, Profile, WalletFormat};
use crate::online::ConfiguredScanner;
use crate::wallet::FileWallet;
use crate::*;
use bitcoin::PrivateKey;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

pub mod account;

/// Range of blocks the chain scanner is asked to examine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ScanRange {
    pub start: u32,
    pub count: u32,
}

/// Requested after every import: it only wakes the scanner up, a full
/// history reconciliation is the separate `rescan` operation.
pub const BOOTSTRAP_SCAN: ScanRange = ScanRange { start: 0, count: 1 };

/// Wallet key store, the only place where raw keys become wallet keys
pub trait KeyStore {
    fn is_open(&self) -> bool;

    fn is_unlocked(&self) -> bool;

    fn is_valid_account_name(&self, name: &str) -> bool {
        account::is_valid_account_name(name)
    }

    /// Persist `key` under `account_name`.
    ///
    /// Importing a key already present must never create a second record, the store either
    /// returns [KeyOutcome::AlreadyPresent] or fails.
    fn import_private_key(
        &mut self,
        key: &PrivateKey,
        account_name: &str,
        is_identity: bool,
    ) -> Result<KeyOutcome>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Created(WalletKey),
    AlreadyPresent(WalletKey),
}

impl KeyOutcome {
    pub fn key(&self) -> &WalletKey {
        match self {
            KeyOutcome::Created(key) | KeyOutcome::AlreadyPresent(key) => key,
        }
    }
}

pub trait ChainScanner {
    /// Blocks until the scanner examined `range`
    fn scan_chain(&mut self, range: ScanRange) -> Result<()>;
}

pub trait Notifier {
    fn notify(&self, message: &str);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}

/// Import keys from a wallet file
#[derive(StructOpt, Debug, Clone, Serialize, Deserialize)]
pub struct ImportFileOptions {
    /// Path of the wallet file to import
    #[structopt(short, long)]
    pub path: PathBuf,

    /// Passphrase of the wallet file, currently ignored: encrypted exports are rejected
    #[structopt(long)]
    pub passphrase: Option<String>,

    /// Account receiving the imported keys
    #[structopt(short, long)]
    pub account_name: String,
}

/// Import the key of a Keyhotee identity
#[derive(StructOpt, Clone)]
pub struct ImportIdentityOptions {
    #[structopt(long)]
    pub first_name: String,

    #[structopt(long, default_value = "")]
    pub middle_name: String,

    #[structopt(long)]
    pub last_name: String,

    /// Brain key of the identity profile
    #[structopt(long)]
    pub brain_key: String,

    /// Keyhotee id, imported lowercase as account name
    #[structopt(long)]
    pub handle: String,
}

impl std::fmt::Debug for ImportIdentityOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportIdentityOptions")
            .field("first_name", &self.first_name)
            .field("middle_name", &self.middle_name)
            .field("last_name", &self.last_name)
            .field("handle", &self.handle)
            .finish()
    }
}

pub struct Importer<'a, K: KeyStore, S: ChainScanner + ?Sized> {
    store: &'a mut K,
    scanner: &'a mut S,
    sources: &'a KeySources,
    notifier: &'a dyn Notifier,
}

impl<'a, K: KeyStore, S: ChainScanner + ?Sized> Importer<'a, K, S> {
    pub fn new(
        store: &'a mut K,
        scanner: &'a mut S,
        sources: &'a KeySources,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Importer {
            store,
            scanner,
            sources,
            notifier,
        }
    }

    /// Checked before touching any file, a bad name never causes a decryption
    pub fn check_preconditions(&self, account_name: &str) -> Result<()> {
        if !self.store.is_valid_account_name(account_name) {
            return Err(Error::InvalidName(account_name.to_string()));
        }
        if !self.store.is_open() {
            return Err(Error::WalletNotOpen);
        }
        if !self.store.is_unlocked() {
            return Err(Error::WalletLocked);
        }
        Ok(())
    }

    pub fn admit(
        &mut self,
        key: &PrivateKey,
        account_name: &str,
        is_identity: bool,
    ) -> Result<KeyOutcome> {
        let outcome = self
            .store
            .import_private_key(key, account_name, is_identity)?;
        debug!(
            "admitted {} in {} {:?}",
            outcome.key().address,
            account_name,
            outcome
        );
        Ok(outcome)
    }

    pub fn request_scan(&mut self) -> Result<()> {
        self.scanner.scan_chain(BOOTSTRAP_SCAN).map_err(|e| match e {
            e @ Error::Scan(_) => e,
            e => Error::Scan(e.to_string()),
        })
    }

    /// Keys are admitted in order and the first failure stops the import, keys admitted before
    /// it stay in the wallet and no scan is requested.
    pub fn import_file(
        &mut self,
        format: WalletFormat,
        path: &Path,
        passphrase: Option<&str>,
        account_name: &str,
    ) -> Result<ImportOutput> {
        self.file_pipeline(format, path, passphrase, account_name)
            .map_err(|e| file_context(e, format, path, account_name))
    }

    fn file_pipeline(
        &mut self,
        format: WalletFormat,
        path: &Path,
        passphrase: Option<&str>,
        account_name: &str,
    ) -> Result<ImportOutput> {
        self.check_preconditions(account_name)?;

        let passphrase = passphrase.filter(|p| !p.is_empty());
        let keys = self
            .sources
            .extractor(format)
            .extract(path, passphrase)
            .map_err(as_extraction)?;
        debug!("{} keys extracted from {:?}", keys.len(), path);

        let mut addresses = Vec::with_capacity(keys.len());
        for key in keys.iter() {
            let outcome = self.admit(key, account_name, false)?;
            addresses.push(outcome.key().address.clone());
        }

        self.request_scan()?;

        let source = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.notifier.notify(&format!(
            "Successfully imported {} keys from {}",
            keys.len(),
            source
        ));
        Ok(ImportOutput {
            account_name: account_name.to_string(),
            count: keys.len(),
            source: Some(source),
            addresses,
        })
    }

    pub fn import_from_bitcoin_file(
        &mut self,
        path: &Path,
        passphrase: Option<&str>,
        account_name: &str,
    ) -> Result<ImportOutput> {
        self.import_file(WalletFormat::Bitcoin, path, passphrase, account_name)
    }

    pub fn import_from_multibit_file(
        &mut self,
        path: &Path,
        passphrase: Option<&str>,
        account_name: &str,
    ) -> Result<ImportOutput> {
        self.import_file(WalletFormat::MultiBit, path, passphrase, account_name)
    }

    pub fn import_from_electrum_file(
        &mut self,
        path: &Path,
        passphrase: Option<&str>,
        account_name: &str,
    ) -> Result<ImportOutput> {
        self.import_file(WalletFormat::Electrum, path, passphrase, account_name)
    }

    pub fn import_from_armory_file(
        &mut self,
        path: &Path,
        passphrase: Option<&str>,
        account_name: &str,
    ) -> Result<ImportOutput> {
        self.import_file(WalletFormat::Armory, path, passphrase, account_name)
    }

    /// The handle is lowercased once and that form is both validated and used as account name.
    /// The brain key never appears in the error context.
    pub fn import_from_identity(&mut self, profile: &Profile, handle: &str) -> Result<ImportOutput> {
        self.identity_pipeline(profile, handle)
            .map_err(|e| identity_context(e, profile, handle))
    }

    fn identity_pipeline(&mut self, profile: &Profile, handle: &str) -> Result<ImportOutput> {
        let account_name = handle.to_lowercase();
        self.check_preconditions(&account_name)?;

        let key = self
            .sources
            .identity
            .derive(profile, handle)
            .map_err(as_extraction)?;
        let outcome = self.admit(&key, &account_name, true)?;

        self.request_scan()?;

        self.notifier
            .notify("Successfully imported Keyhotee private key.");
        Ok(ImportOutput {
            account_name,
            count: 1,
            source: None,
            addresses: vec![outcome.key().address.clone()],
        })
    }
}

fn as_extraction(e: Error) -> Error {
    match e {
        e @ Error::Extraction(_) => e,
        e => Error::Extraction(e.to_string()),
    }
}

fn file_context(e: Error, format: WalletFormat, path: &Path, account_name: &str) -> Error {
    e.context(
        &format!("error importing {} wallet", format),
        vec![
            ("path", path.display().to_string()),
            ("account_name", account_name.to_string()),
        ],
    )
}

fn identity_context(e: Error, profile: &Profile, handle: &str) -> Error {
    e.context(
        "error creating private key using keyhotee info",
        vec![
            ("first_name", profile.first_name.clone()),
            ("middle_name", profile.middle_name.clone()),
            ("last_name", profile.last_name.clone()),
            ("handle", handle.to_string()),
        ],
    )
}

impl Context {
    pub fn import_file(&self, format: WalletFormat, opt: &ImportFileOptions) -> Result<ImportOutput> {
        let mut wallet = FileWallet::open(self.clone())
            .map_err(|e| file_context(e, format, &opt.path, &opt.account_name))?;
        let mut scanner = ConfiguredScanner::new(self.clone());
        let sources = KeySources::new(self.network);
        let mut importer = Importer::new(&mut wallet, &mut scanner, &sources, &LogNotifier);
        importer.import_file(
            format,
            &opt.path,
            opt.passphrase.as_deref(),
            &opt.account_name,
        )
    }

    pub fn import_identity(&self, opt: &ImportIdentityOptions) -> Result<ImportOutput> {
        let profile = Profile {
            first_name: opt.first_name.clone(),
            middle_name: opt.middle_name.clone(),
            last_name: opt.last_name.clone(),
            brain_key: opt.brain_key.clone(),
        };
        let mut wallet = FileWallet::open(self.clone())
            .map_err(|e| identity_context(e, &profile, &opt.handle))?;
        let mut scanner = ConfiguredScanner::new(self.clone());
        let sources = KeySources::new(self.network);
        let mut importer = Importer::new(&mut wallet, &mut scanner, &sources, &LogNotifier);
        importer.import_from_identity(&profile, &opt.handle)
    }
}
