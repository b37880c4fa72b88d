use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

struct Env {
    _dir: tempfile::TempDir,
    config_dir: PathBuf,
    data_dir: PathBuf,
    root: PathBuf,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            root,
            _dir: dir,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("billbook").unwrap();
        cmd.env("BILLBOOK_CONFIG_DIR", &self.config_dir)
            .env_remove("OPENAI_API_KEY")
            .env_remove("OPENAI_MODEL")
            .env_remove("RUST_LOG");
        cmd
    }

    fn initialized() -> Self {
        let env = Self::new();
        env.cmd()
            .args(["init", "--data-dir"])
            .arg(&env.data_dir)
            .assert()
            .success()
            .stdout(predicate::str::contains("Initialized billbook"));
        env
    }

    fn write(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn accounts_items_and_totals() {
    let env = Env::initialized();
    env.cmd().args(["accounts", "add", "Household"]).assert().success();
    env.cmd().args(["accounts", "add", "Car"]).assert().success();
    env.cmd()
        .args(["accounts", "add", "Car"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account already exists"));

    env.cmd()
        .args(["items", "add", "--account", "Household", "Rent", "--price", "1200"])
        .assert()
        .success();
    env.cmd()
        .args(["items", "add", "--account", "Car", "Fuel", "--price", "45.5", "--category", "transport"])
        .assert()
        .success();

    env.cmd()
        .args(["items", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent").and(predicate::str::contains("$45.50")));

    env.cmd()
        .arg("totals")
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,245.50"));
}

#[test]
fn rename_and_remove_account_cascade() {
    let env = Env::initialized();
    env.cmd().args(["accounts", "add", "Home"]).assert().success();
    env.cmd()
        .args(["items", "add", "--account", "Home", "Lamp", "--price", "20"])
        .assert()
        .success();
    env.cmd().args(["accounts", "rename", "Home", "House"]).assert().success();
    env.cmd()
        .args(["items", "list", "--account", "House"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lamp"));
    env.cmd()
        .args(["accounts", "remove", "House"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 items"));
    env.cmd()
        .args(["items", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items"));
}

#[test]
fn extract_text_file_offline() {
    let env = Env::new();
    let file = env.write("coffee.txt", b"Coffee $4.50");
    let output = env
        .cmd()
        .args(["extract", arg(&file), "--category", "food", "--category", "other"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let bill: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(bill["source_filename"], "coffee.txt");
    assert_eq!(bill["items"][0]["category"], "food");
    assert_eq!(bill["items"][0]["price"], 0.0);
    assert!(bill["items"][0]["description"].as_str().unwrap().starts_with("Coffee $4.50"));
}

#[test]
fn extract_rejects_missing_and_unsupported_files() {
    let env = Env::new();
    env.cmd()
        .args(["extract", arg(&env.root.join("nope.pdf"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));

    let exe = env.write("setup.exe", b"MZ");
    env.cmd()
        .args(["extract", arg(&exe)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type: .exe"));
}

#[test]
fn extract_document_without_key_reports_missing_credential() {
    let env = Env::new();
    let pdf = env.write("bill.pdf", b"%PDF-1.4");
    env.cmd()
        .args(["extract", arg(&pdf)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not configured"));
}

#[test]
fn failed_import_leaves_nothing_behind() {
    let env = Env::initialized();
    env.cmd().args(["accounts", "add", "Household"]).assert().success();
    let pdf = env.write("bill.pdf", b"%PDF-1.4");

    for _ in 0..2 {
        env.cmd()
            .args(["import", arg(&pdf), "--account", "Household"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("API key not configured"));
    }

    env.cmd()
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bills archived"));
    env.cmd()
        .args(["items", "list", "--account", "Household"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items to show yet."));
}

#[test]
fn import_text_records_items_once() {
    let env = Env::initialized();
    env.cmd().args(["accounts", "add", "Groceries"]).assert().success();
    let file = env.write("note.txt", b"Weekly shop");

    env.cmd()
        .args(["import", arg(&file), "--account", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 items recorded in Groceries"));

    env.cmd()
        .args(["import", arg(&file), "--account", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already been imported"));

    env.cmd()
        .args(["items", "list", "--account", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weekly shop").and(predicate::str::contains("groceries")));

    env.cmd()
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("note.txt"));
}

#[test]
fn config_key_is_masked() {
    let env = Env::initialized();
    env.cmd().args(["config", "set-key", "sk-secret-9876"]).assert().success();
    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9876").and(predicate::str::contains("secret").not()));
}

#[test]
fn commands_need_init() {
    let env = Env::new();
    env.cmd()
        .args(["accounts", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("billbook init"));
}
