use crate::{expand_tilde, Error, Result};
use bitcoin::Network;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum Kind {
    WalletInfo,
    WalletKey,
    ScanRequest,
}

impl Kind {
    /// Sub-directory of the wallet directory, if the kind has many instances
    pub fn dir(&self) -> Option<&str> {
        match self {
            Kind::WalletKey => Some("keys"),
            Kind::WalletInfo | Kind::ScanRequest => None,
        }
    }

    fn file_name(&self, name: &str) -> String {
        match self {
            Kind::WalletInfo => "wallet_info.json".to_string(),
            Kind::WalletKey => format!("{}.json", name),
            Kind::ScanRequest => "scan_request.json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Identifier {
    pub kind: Kind,
    pub name: String,
    pub wallet: String,
    pub network: Network,
}

pub trait Identifiable {
    fn id(&self) -> &Identifier;
}

pub trait Overwritable {
    fn can_overwrite() -> bool;
}

pub trait WhichKind {
    fn kind() -> Kind;
}

impl Identifier {
    pub fn new(network: Network, wallet: &str, kind: Kind, name: &str) -> Self {
        Identifier {
            network,
            wallet: wallet.to_string(),
            kind,
            name: name.to_string(),
        }
    }

    /// Directory containing every file of the given wallet
    pub fn wallet_dir<P: AsRef<Path>>(datadir: P, network: Network, wallet: &str) -> Result<PathBuf> {
        let mut path = expand_tilde(datadir)?;
        path.push(network.to_string());
        path.push(wallet);
        Ok(path)
    }

    pub fn as_path_buf<P: AsRef<Path>>(
        &self,
        datadir: P,
        create_if_missing: bool,
    ) -> Result<PathBuf> {
        let mut path = Self::wallet_dir(datadir, self.network, &self.wallet)?;
        if let Some(dir) = self.kind.dir() {
            path.push(dir);
        }
        if create_if_missing && !path.exists() {
            fs::create_dir_all(&path)?;
            debug!("created {:?}", path);
        }
        path.push(self.kind.file_name(&self.name));
        Ok(path)
    }

    pub fn exists<P: AsRef<Path>>(&self, datadir: P) -> Result<bool> {
        Ok(self.as_path_buf(datadir, false)?.exists())
    }

    pub fn read<T, P>(&self, datadir: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = self.as_path_buf(datadir, false)?;
        debug!("reading {:?}", path);
        let content = fs::read(&path)
            .map_err(|e| Error::FileNotFoundOrCorrupt(path.clone(), e.to_string()))?;
        serde_json::from_slice(&content)
            .map_err(|e| Error::FileNotFoundOrCorrupt(path, e.to_string()))
    }

    pub fn write<T, P>(&self, datadir: P, value: &T, can_overwrite: bool) -> Result<()>
    where
        T: Serialize + Debug,
        P: AsRef<Path>,
    {
        let path = self.as_path_buf(datadir, true)?;
        debug!(
            "Identifier::write {:?} can_overwrite:{}",
            path, can_overwrite
        );
        if path.exists() && !can_overwrite {
            return Err(Error::CannotOverwrite(path));
        }
        let content = serde_json::to_vec_pretty(value)?;
        fs::write(&path, &content)?;
        Ok(())
    }

    pub fn remove<P: AsRef<Path>>(&self, datadir: P) -> Result<()> {
        let path = self.as_path_buf(datadir, false)?;
        if path.exists() {
            debug!("removing {:?}", path);
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
