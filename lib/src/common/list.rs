use crate::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

#[derive(StructOpt, Debug, Serialize, Deserialize)]
pub struct ListOptions {
    /// list only the keys of this account
    #[structopt(short, long)]
    pub account_name: Option<String>,
}

impl Context {
    pub fn list(&self, opt: &ListOptions) -> Result<ListOutput> {
        let mut path = Identifier::wallet_dir(&self.datadir, self.network, &self.wallet_name)?;
        if let Some(dir) = Kind::WalletKey.dir() {
            path.push(dir);
        }
        let mut list = ListOutput::default();

        if path.is_dir() {
            debug!("listing {:?}", path);
            for entry in std::fs::read_dir(path)? {
                let path = entry?.path();
                debug!("try to read key {:?}", path);
                let key: WalletKey = match std::fs::read(&path)
                    .map_err(Error::from)
                    .and_then(|bytes| Ok(serde_json::from_slice(&bytes)?))
                {
                    Ok(key) => key,
                    Err(e) => {
                        warn!("Can't read key {:?} {:?}", path, e);
                        continue;
                    }
                };
                match opt.account_name.as_ref() {
                    Some(account) if account != &key.account => continue,
                    _ => list.keys.push((&key).into()),
                }
            }
        }
        list.keys.sort_by(|a, b| {
            (&a.account, a.address.to_string()).cmp(&(&b.account, b.address.to_string()))
        });

        Ok(list)
    }
}
