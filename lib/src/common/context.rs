use crate::common::encryption::EncryptionKey;
use crate::*;
use bitcoin::blockdata::constants::genesis_block;
use bitcoin::Network;
use bitcoincore_rpc::{Auth, Client, RpcApi};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io::Read;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt, Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Network (bitcoin, testnet, regtest, signet)
    #[structopt(short, long, default_value = "testnet")]
    pub network: bitcoin::Network,

    /// Directory where wallets are saved
    #[structopt(short, long, default_value = "~/.importa/")]
    pub datadir: String,

    /// Name of the wallet receiving the imported keys
    #[structopt(short, long, default_value = "default")]
    pub wallet_name: String,

    #[structopt(skip)]
    pub encryption_key: Option<StringEncoding>,
}

#[derive(StructOpt, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaemonOpts {
    /// Bitcoin node rpc url
    #[structopt(long)]
    pub url: String,

    /// Bitcoin node cookie file
    #[structopt(long)]
    pub cookie_file: PathBuf,

    /// Name of the bitcoin node wallet used for rescans, the node default if missing
    #[structopt(long)]
    pub node_wallet: Option<String>,
}

impl DaemonOpts {
    /// creates RPC client to bitcoin node.
    /// It also checks the `network` parameter is the same as the connecting node
    pub fn make_client(&self, network: Network) -> Result<Client> {
        let url = match self.node_wallet.as_ref() {
            Some(wallet) => format!("{}/wallet/{}", self.url, wallet),
            None => self.url.to_string(),
        };
        debug!("creating client with url {}", url);
        let client = Client::new(&url, Auth::CookieFile(self.cookie_file.clone()))?;
        let node_genesis = client.get_block_hash(0)?;
        let expected = genesis_block(network).block_hash();
        if node_genesis != expected {
            return Err(Error::IncompatibleGenesis {
                node: node_genesis,
                expected,
            });
        }
        Ok(client)
    }
}

impl Context {
    pub fn base(&self) -> Result<PathBuf> {
        let mut path = expand_tilde(&self.datadir)?;
        path.push(self.network.to_string());
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        Ok(path)
    }

    pub fn encryption_key(&self) -> Result<Option<EncryptionKey>> {
        self.encryption_key
            .as_ref()
            .map(|k| k.get_exactly_32())
            .transpose()
    }

    pub fn id(&self, kind: Kind, name: &str) -> Identifier {
        Identifier::new(self.network, &self.wallet_name, kind, name)
    }

    pub fn read<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + WhichKind,
    {
        self.id(T::kind(), name).read(&self.datadir)
    }

    pub fn write<T>(&self, value: &T) -> Result<()>
    where
        T: Serialize + Debug + Identifiable + Overwritable,
    {
        value
            .id()
            .write(&self.datadir, value, T::can_overwrite())
    }

    fn daemon_opts_path(&self) -> Result<PathBuf> {
        let mut path = self.base()?;
        path.push("daemon_opts.json");
        Ok(path)
    }

    pub fn has_daemon_opts(&self) -> Result<bool> {
        Ok(self.daemon_opts_path()?.exists())
    }

    pub fn read_daemon_opts(&self) -> Result<DaemonOpts> {
        let path = self.daemon_opts_path()?;
        debug!("reading daemon_opts from {:?}", path);
        let bytes = std::fs::read(&path)
            .map_err(|e| crate::Error::FileNotFoundOrCorrupt(path.clone(), e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn write_daemon_opts(&self, daemon_opts: DaemonOpts) -> Result<DaemonOpts> {
        let path = self.daemon_opts_path()?;
        debug!("writing daemon_opts in {:?}", path);
        let bytes = serde_json::to_vec_pretty(&daemon_opts)?;
        std::fs::write(&path, &bytes)
            .map_err(|e| crate::Error::FileNotFoundOrCorrupt(path, e.to_string()))?;
        Ok(daemon_opts)
    }

    pub fn make_client(&self) -> Result<Client> {
        self.read_daemon_opts()?.make_client(self.network)
    }

    pub fn read_encryption_key(&mut self) -> Result<()> {
        // read encryption key from stdin and initialize encryption_key field
        let mut buffer = vec![];
        std::io::stdin().read_to_end(&mut buffer)?;
        let encoded = StringEncoding::new_base64(&buffer);
        self.encryption_key = Some(encoded);
        Ok(())
    }
}

// from https://stackoverflow.com/questions/54267608/expand-tilde-in-rust-path-idiomatically
pub fn expand_tilde<P: AsRef<Path>>(path_user_input: P) -> Result<PathBuf> {
    let p = path_user_input.as_ref();
    if p.starts_with("~") {
        let mut home_dir = home::home_dir().ok_or(Error::CannotRetrieveHomeDir)?;
        if p == Path::new("~") {
            Ok(home_dir)
        } else if home_dir == Path::new("/").to_path_buf() {
            // Corner case: `home_dir` root directory;
            // don't prepend extra `/`, just drop the tilde.
            Ok(p.strip_prefix("~")?.to_path_buf())
        } else {
            home_dir.push(p.strip_prefix("~/")?);
            Ok(home_dir)
        }
    } else {
        Ok(p.to_path_buf())
    }
}
