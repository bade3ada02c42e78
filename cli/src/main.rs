use importa::extract::WalletFormat;
use importa::import::{ImportFileOptions, ImportIdentityOptions};
use importa::list::ListOptions;
use importa::log::debug;
use importa::online::rescan::RescanOptions;
use importa::serde_json::{self, Value};
use importa::{init_logger, Context, DaemonOpts, Result};
use std::convert::TryInto;
use structopt::StructOpt;
use ImportaSubcommands::*;

/// importa moves private keys found in bitcoin, multibit, electrum and armory wallet files,
/// or derived from a Keyhotee identity, into an encrypted wallet.
#[derive(StructOpt, Debug)]
#[structopt(name = "importa")]
struct ImportaCommands {
    #[structopt(flatten)]
    context: Context,

    #[structopt(subcommand)]
    subcommand: ImportaSubcommands,

    /// Flag to indicate that the wallet encryption key is expected in standard input.
    /// Since reading stdin is locking, we need this flag to have it optionally
    #[structopt(long)]
    pub read_stdin: bool,
}

#[derive(StructOpt, Debug)]
enum ImportaSubcommands {
    /// Connect a bitcoin node, used to rescan after imports
    Connect(DaemonOpts),

    /// Create a new wallet encrypted with the key given in stdin
    CreateWallet,

    /// Import keys from a Bitcoin Core `dumpwallet` file
    ImportBitcoin(ImportFileOptions),

    /// Import keys from a MultiBit `.key` export
    ImportMultibit(ImportFileOptions),

    /// Import keys from an Electrum wallet file
    ImportElectrum(ImportFileOptions),

    /// Import keys from an Armory key list export
    ImportArmory(ImportFileOptions),

    /// Import the key derived from a Keyhotee identity
    ImportKeyhotee(ImportIdentityOptions),

    /// List imported keys
    ListKeys(ListOptions),

    /// Rescan the blockchain from the given height, or from the pending scan request
    Rescan(RescanOptions),
}

fn main() -> Result<()> {
    init_logger();
    let mut cmd = ImportaCommands::from_args();
    debug!("importa start network:{}", cmd.context.network);

    let value = match launch_subcommand(&mut cmd) {
        Ok(value) => value,
        Err(e) => e.to_json(),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

fn launch_subcommand(cmd: &mut ImportaCommands) -> Result<Value> {
    if cmd.read_stdin {
        cmd.context.read_encryption_key()?;
    }
    let ImportaCommands {
        context,
        subcommand,
        read_stdin: _,
    } = cmd;
    match subcommand {
        Connect(opt) => {
            opt.make_client(context.network)?;
            context.write_daemon_opts(opt.clone())?.try_into()
        }
        CreateWallet => context.create_wallet()?.try_into(),
        ImportBitcoin(opt) => context.import_file(WalletFormat::Bitcoin, opt)?.try_into(),
        ImportMultibit(opt) => context.import_file(WalletFormat::MultiBit, opt)?.try_into(),
        ImportElectrum(opt) => context.import_file(WalletFormat::Electrum, opt)?.try_into(),
        ImportArmory(opt) => context.import_file(WalletFormat::Armory, opt)?.try_into(),
        ImportKeyhotee(opt) => context.import_identity(opt)?.try_into(),
        ListKeys(opt) => context.list(opt)?.try_into(),
        Rescan(opt) => context.rescan(opt)?.try_into(),
    }
}
