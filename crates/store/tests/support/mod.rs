#![allow(dead_code)]

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rusqlite::{Connection, params};
use tempfile::TempDir;

pub struct TestStore {
    pub _dir: TempDir,
    pub path: PathBuf,
}

pub fn create_store(value: Option<&str>) -> TestStore {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("state.vscdb");
    write_item_table(&path, value);
    TestStore { _dir: dir, path }
}

pub fn write_item_table(path: &Path, value: Option<&str>) {
    let conn = Connection::open(path).expect("open store");
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB)",
    )
    .expect("create table");
    conn.execute(
        "INSERT INTO ItemTable (key, value) VALUES (?1, ?2)",
        params!["some.other.key", "{}"],
    )
    .expect("insert filler");
    if let Some(value) = value {
        conn.execute(
            "INSERT INTO ItemTable (key, value) VALUES (?1, ?2)",
            params!["antigravityAuthStatus", value],
        )
        .expect("insert auth status");
    }
}

pub fn envelope_for(bytes: &[u8]) -> String {
    format!(
        r#"{{"name":"user","userStatusProtoBinaryBase64":"{}"}}"#,
        STANDARD.encode(bytes)
    )
}
