#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, TimeZone, Utc};
use gauge_app::{RunFlag, Screen, SnapshotSource};
use gauge_core::{ModelQuotaRecord, QuotaSnapshot};
use gauge_scan::encode_varint;
use gauge_store::ExtractionError;
use rusqlite::{Connection, params};
use tempfile::TempDir;

pub const HIGH_TIER: &str = "Gemini 3 Pro (High)";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("start time")
}

pub struct Fixture {
    pub dir: TempDir,
    pub store_path: PathBuf,
    pub ledger_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let store_path = dir.path().join("state.vscdb");
        let ledger_path = dir.path().join("logs").join("token_usage.csv");
        Self {
            dir,
            store_path,
            ledger_path,
        }
    }

    /// Writes the item table, with the auth status row when `blob` is set.
    pub fn write_store(&self, blob: Option<&[u8]>) {
        let conn = Connection::open(&self.store_path).expect("open store");
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB)",
        )
        .expect("create table");
        if let Some(blob) = blob {
            let envelope = format!(
                r#"{{"userStatusProtoBinaryBase64":"{}"}}"#,
                STANDARD.encode(blob)
            );
            conn.execute(
                "INSERT INTO ItemTable (key, value) VALUES (?1, ?2)",
                params!["antigravityAuthStatus", envelope],
            )
            .expect("insert auth status");
        }
    }
}

/// Length-prefixed model name, some filler, then the quota marker and value.
pub fn quota_blob(models: &[(&str, u64)]) -> Vec<u8> {
    let mut buf = vec![0x08, 0x01];
    for (name, quota) in models {
        buf.push(0x0a);
        buf.push(name.len() as u8);
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(&[0x1a, 0x02, 0x00, 0x00, 0x12, 0x03, 0x08]);
        buf.extend_from_slice(&encode_varint(*quota));
    }
    buf
}

/// Screen that keeps every frame and report, optionally stopping a run flag
/// once enough frames were drawn.
#[derive(Default)]
pub struct RecordingScreen {
    pub frames: Vec<String>,
    pub reports: Vec<String>,
    pub stop_after: Option<(usize, RunFlag)>,
}

impl RecordingScreen {
    pub fn stopping(after: usize, flag: RunFlag) -> Self {
        Self {
            stop_after: Some((after, flag)),
            ..Self::default()
        }
    }
}

impl Screen for RecordingScreen {
    fn draw(&mut self, frame: &str) -> io::Result<()> {
        self.frames.push(frame.to_string());
        if let Some((after, flag)) = &self.stop_after {
            if self.frames.len() >= *after {
                flag.stop();
            }
        }
        Ok(())
    }

    fn report(&mut self, message: &str) {
        self.reports.push(message.to_string());
    }
}

/// Source that replays a script of high-tier quotas; `None` fails the tick.
/// The last step repeats once the script runs out.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Option<u64>>>,
    last: Mutex<Option<u64>>,
}

impl ScriptedSource {
    pub fn new(steps: &[Option<u64>]) -> Self {
        Self {
            steps: Mutex::new(steps.iter().copied().collect()),
            last: Mutex::new(None),
        }
    }
}

impl SnapshotSource for ScriptedSource {
    fn snapshot(&self, now: DateTime<Utc>) -> Result<QuotaSnapshot, ExtractionError> {
        let mut steps = self.steps.lock().expect("steps");
        let mut last = self.last.lock().expect("last");
        let step = match steps.pop_front() {
            Some(step) => {
                *last = step;
                step
            }
            None => *last,
        };
        let remaining = step.ok_or(ExtractionError::NoAuthStatus)?;
        Ok(QuotaSnapshot {
            timestamp: now,
            records: vec![ModelQuotaRecord {
                identity: HIGH_TIER.to_string(),
                limit: Some(1000.max(remaining)),
                remaining: Some(remaining),
                units: "credits".to_string(),
            }],
            source: self.descriptor(),
        })
    }

    fn descriptor(&self) -> String {
        "scripted".to_string()
    }
}
