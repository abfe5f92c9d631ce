use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rusqlite::Connection;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn status(&self, store: &Path, extra: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gauge-status"))
            .args(extra)
            .env("GAUGE_CONFIG", self.path("config.toml"))
            .env("GAUGE_STORE_PATH", store)
            .env("GAUGE_LEDGER_PATH", self.path("token_usage.csv"))
            .env("GAUGE_LOG", "off")
            .output()
            .expect("run gauge-status")
    }
}

fn store_without_auth_status(path: &Path) {
    let conn = Connection::open(path).expect("open store");
    conn.execute_batch(
        "CREATE TABLE ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB);
         INSERT INTO ItemTable (key, value) VALUES ('some.other.key', '{}');",
    )
    .expect("seed store");
}

#[test]
fn missing_store_exits_with_error() {
    let workspace = Workspace::new();
    let output = workspace.status(&workspace.path("nope.vscdb"), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("state store not found"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn store_without_auth_status_shows_unknown() {
    let workspace = Workspace::new();
    let store = workspace.path("state.vscdb");
    store_without_auth_status(&store);

    let output = workspace.status(&store, &["--plain"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Status: UNKNOWN"), "stdout: {stdout}");
    assert!(stdout.contains("no auth status found"), "stdout: {stdout}");
    assert!(workspace.path("config.toml").exists());
}

#[test]
fn json_status_for_store_without_auth_status() {
    let workspace = Workspace::new();
    let store = workspace.path("state.vscdb");
    store_without_auth_status(&store);

    let output = workspace.status(&store, &["--json"]);

    assert_eq!(output.status.code(), Some(0));
    let status: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("status json");
    assert_eq!(status["tier"], "UNKNOWN");
    assert_eq!(status["reasoning"], "no auth status found");
}
