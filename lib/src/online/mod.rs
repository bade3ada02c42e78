use crate::import::{ChainScanner, ScanRange};
use crate::*;
use bitcoin::Network;
use bitcoincore_rpc::RpcApi;
use log::{debug, info};

pub mod rescan;

/// Asks the connected bitcoin node wallet to rescan, the node is contacted only when a scan is
/// requested
pub struct NodeScanner {
    daemon_opts: DaemonOpts,
    network: Network,
}

impl NodeScanner {
    pub fn new(daemon_opts: DaemonOpts, network: Network) -> Self {
        NodeScanner {
            daemon_opts,
            network,
        }
    }
}

impl ChainScanner for NodeScanner {
    fn scan_chain(&mut self, range: ScanRange) -> Result<()> {
        let client = self
            .daemon_opts
            .make_client(self.network)
            .map_err(|e| Error::Scan(e.to_string()))?;
        let stop = range.start + range.count.saturating_sub(1);
        debug!("rescan_blockchain({}, {})", range.start, stop);
        let (start, stop) = client
            .rescan_blockchain(Some(range.start as usize), Some(stop as usize))
            .map_err(|e| Error::Scan(e.to_string()))?;
        info!("node scanned from {} to {:?}", start, stop);
        Ok(())
    }
}

/// Picks the scanner when a scan is requested: the connected node if `connect` was run,
/// [PendingScan] otherwise
pub struct ConfiguredScanner {
    context: Context,
}

impl ConfiguredScanner {
    pub fn new(context: Context) -> Self {
        ConfiguredScanner { context }
    }
}

impl ChainScanner for ConfiguredScanner {
    fn scan_chain(&mut self, range: ScanRange) -> Result<()> {
        if self.context.has_daemon_opts()? {
            let daemon_opts = self.context.read_daemon_opts()?;
            NodeScanner::new(daemon_opts, self.context.network).scan_chain(range)
        } else {
            info!("no bitcoin node connected, rescan will be pending");
            PendingScan::new(self.context.clone()).scan_chain(range)
        }
    }
}

/// Without a node the scan request is persisted, the next `rescan` picks it up
pub struct PendingScan {
    context: Context,
}

impl PendingScan {
    pub fn new(context: Context) -> Self {
        PendingScan { context }
    }
}

impl ChainScanner for PendingScan {
    fn scan_chain(&mut self, range: ScanRange) -> Result<()> {
        let request = ScanRequest {
            id: self.context.id(Kind::ScanRequest, &self.context.wallet_name),
            start_height: range.start,
            count: range.count,
        };
        self.context
            .write(&request)
            .map_err(|e| Error::Scan(e.to_string()))?;
        info!(
            "scan from {} pending, run rescan once a node is connected",
            range.start
        );
        Ok(())
    }
}
