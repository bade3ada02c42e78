use crate::*;
use bitcoincore_rpc::RpcApi;
use log::info;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
pub struct RescanOptions {
    /// Specify the block height from which doing a blockchain rescan (use 0 to start from the beginning),
    /// if missing the pending scan request of the wallet is used, or 0
    #[structopt(long)]
    pub start_from: Option<usize>,
}

impl Context {
    fn pending_scan(&self) -> Option<ScanRequest> {
        self.read::<ScanRequest>(&self.wallet_name).ok()
    }

    /// The height a rescan starts from, the pending request is ignored if `opt` names one
    pub fn rescan_start(&self, opt: &RescanOptions) -> usize {
        opt.start_from
            .or_else(|| self.pending_scan().map(|r| r.start_height as usize))
            .unwrap_or(0)
    }

    pub fn rescan(&self, opt: &RescanOptions) -> Result<RescanOutput> {
        let start_from = self.rescan_start(opt);
        let client = self.make_client()?;
        let (_a, b) = client
            .rescan_blockchain(Some(start_from), None)
            .map_err(|e| Error::Scan(e.to_string()))?;
        let stop_height = b.ok_or(Error::MissingRescanUpTo)?;
        self.id(Kind::ScanRequest, &self.wallet_name)
            .remove(&self.datadir)?;
        info!("rescanned from {} to {}", start_from, stop_height);
        Ok(RescanOutput {
            start_from,
            stop_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RescanOptions;
    use crate::common::context::tests::TestContext;
    use crate::import::{ChainScanner, ScanRange};
    use crate::online::PendingScan;

    #[test]
    fn test_rescan_start() {
        let context = TestContext::default();
        let none = RescanOptions { start_from: None };
        assert_eq!(context.rescan_start(&none), 0);

        PendingScan::new(context.context.clone())
            .scan_chain(ScanRange {
                start: 700,
                count: 1,
            })
            .unwrap();
        assert_eq!(context.rescan_start(&none), 700);

        let explicit = RescanOptions {
            start_from: Some(5),
        };
        assert_eq!(context.rescan_start(&explicit), 5);
    }

    #[test]
    fn test_rescan_without_node() {
        let context = TestContext::default();
        let opt = RescanOptions { start_from: None };
        assert!(context.rescan(&opt).is_err());
    }
}
