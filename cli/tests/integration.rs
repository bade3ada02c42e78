use importa::bitcoin::secp256k1::SecretKey;
use importa::bitcoin::{Network, PrivateKey};
use importa::serde_json::{self, from_value, json, to_string_pretty, Value};
use importa::*;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

const ENCRYPTION_KEY: [u8; 32] = [7u8; 32];

fn rnd_string() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .collect::<String>()
        .to_lowercase()
}

fn regtest_key(n: u8) -> PrivateKey {
    PrivateKey {
        compressed: true,
        network: Network::Regtest,
        key: SecretKey::from_slice(&[n; 32]).unwrap(),
    }
}

struct ImportaCommand {
    pub work_dir: TempDir,
    pub wallet_name: String,
}

impl ImportaCommand {
    pub fn new() -> Self {
        ImportaCommand {
            work_dir: TempDir::new().unwrap(),
            wallet_name: rnd_string(),
        }
    }

    fn run(&self, stdin: Option<&[u8]>, subcmd: &str, args: Vec<&str>) -> Result<Value> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_importa"));
        command
            .current_dir(self.work_dir.path())
            .arg("--datadir")
            .arg(format!("{}/", self.work_dir.path().display()))
            .arg("--network")
            .arg("regtest")
            .arg("--wallet-name")
            .arg(&self.wallet_name);
        if stdin.is_some() {
            command.arg("--read-stdin");
        }
        let mut child = command
            .arg(subcmd)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        {
            let mut child_stdin = child.stdin.take().unwrap();
            if let Some(bytes) = stdin {
                child_stdin.write_all(bytes).unwrap();
            }
        }
        let output = child.wait_with_output().unwrap();
        if !output.status.success() {
            println!("{}", String::from_utf8_lossy(&output.stderr));
        }
        assert!(output.status.success(), "subcmd:{} args:{:?}", subcmd, args);
        let value: Value = serde_json::from_slice(&output.stdout)?;
        println!("{}", to_string_pretty(&value)?);
        map_json_error(Ok(value))
    }

    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_wallet(&self) -> Result<WalletInfo> {
        let value = self.run(Some(&ENCRYPTION_KEY[..]), "create-wallet", vec![])?;
        Ok(from_value(value)?)
    }

    pub fn import(&self, format: &str, path: &Path, account_name: &str) -> Result<ImportOutput> {
        let path = path.display().to_string();
        let value = self.run(
            Some(&ENCRYPTION_KEY[..]),
            &format!("import-{}", format),
            vec!["--path", &path, "--account-name", account_name],
        )?;
        Ok(from_value(value)?)
    }

    pub fn import_keyhotee(&self, handle: &str, brain_key: &str) -> Result<ImportOutput> {
        let value = self.run(
            Some(&ENCRYPTION_KEY[..]),
            "import-keyhotee",
            vec![
                "--first-name",
                "Alice",
                "--last-name",
                "Liddell",
                "--brain-key",
                brain_key,
                "--handle",
                handle,
            ],
        )?;
        Ok(from_value(value)?)
    }

    pub fn list_keys(&self, account_name: Option<&str>) -> Result<ListOutput> {
        let mut args = vec![];
        if let Some(account_name) = account_name {
            args.push("--account-name");
            args.push(account_name);
        }
        let value = self.run(None, "list-keys", args)?;
        Ok(from_value(value)?)
    }
}

#[test]
fn integration_test() {
    let importa = ImportaCommand::new();

    let err = importa
        .import("multibit", Path::new("/nonexistent"), "alice")
        .unwrap_err();
    assert!(err.to_string().contains("wallet is not open"), "{}", err);

    importa.create_wallet().unwrap();
    let err = importa.create_wallet().unwrap_err();
    assert!(err.to_string().contains("Cannot overwrite"));

    // multibit
    let multibit = importa.write_file(
        "multibit.key",
        &format!(
            "# KEEP YOUR PRIVATE KEYS SAFE !\n{} 2014-03-01T12:51:34Z\n{} 2014-03-01T12:52:00Z\n# End of private keys\n",
            regtest_key(1).to_wif(),
            regtest_key(2).to_wif()
        ),
    );
    let imported = importa.import("multibit", &multibit, "alice").unwrap();
    assert_eq!(imported.count, 2);
    assert_eq!(imported.source.as_deref(), Some("multibit.key"));

    // re-import does not duplicate keys
    let again = importa.import("multibit", &multibit, "alice").unwrap();
    assert_eq!(again.addresses, imported.addresses);
    assert_eq!(importa.list_keys(None).unwrap().keys.len(), 2);

    // the same key under another account is refused
    let err = importa.import("multibit", &multibit, "bob").unwrap_err();
    assert!(err.to_string().contains("already imported under account alice"));

    // electrum
    let electrum = importa.write_file(
        "default_wallet",
        &to_string_pretty(&json!({
            "seed_version": 18,
            "use_encryption": false,
            "keystore": {"type": "imported", "keypairs": {"02aa": regtest_key(3).to_wif()}}
        }))
        .unwrap(),
    );
    let imported = importa.import("electrum", &electrum, "savings.bob").unwrap();
    assert_eq!(imported.count, 1);

    // invalid account name fails before reading the file
    let err = importa
        .import("bitcoin", Path::new("/nonexistent"), "Bob")
        .unwrap_err();
    assert!(err.to_string().contains("Invalid account name: Bob"), "{}", err);

    // extraction failure names the file
    let dump = importa.write_file("dump.txt", "notakey 2021-04-01T10:00:00Z\n");
    let err = importa.import("bitcoin", &dump, "carol").unwrap_err();
    assert!(err.to_string().contains("key extraction failed"), "{}", err);
    assert!(err.to_string().contains("dump.txt"), "{}", err);

    // keyhotee
    let identity = importa.import_keyhotee("Alice", "rabbit hole").unwrap();
    assert_eq!(identity.account_name, "alice");
    assert_eq!(identity.count, 1);
    let alice = importa.list_keys(Some("alice")).unwrap();
    assert_eq!(alice.keys.len(), 3);
    assert_eq!(alice.keys.iter().filter(|k| k.is_identity).count(), 1);

    let err = importa.import_keyhotee("Not Valid", "rabbit hole").unwrap_err();
    assert!(!err.to_string().contains("rabbit hole"));

    // no node connected, the bootstrap scan is pending
    let pending = importa
        .work_dir
        .path()
        .join(format!("regtest/{}/scan_request.json", importa.wallet_name));
    let request: ScanRequest = serde_json::from_slice(&std::fs::read(pending).unwrap()).unwrap();
    assert_eq!((request.start_height, request.count), (0, 1));

    assert_eq!(importa.list_keys(None).unwrap().keys.len(), 4);
}
