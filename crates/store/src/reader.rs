use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde_json::Value;

use crate::error::{ExtractionError, Result};

pub const AUTH_STATUS_KEY: &str = "antigravityAuthStatus";
pub const BINARY_FIELD: &str = "userStatusProtoBinaryBase64";

const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Decoded user-status bytes. Owned by the read that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStateBlob(Vec<u8>);

impl RawStateBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read-only view of the editor's `state.vscdb`.
///
/// The database belongs to a running application, so every read opens a fresh
/// read-only connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short label for dashboards, the store's file name.
    pub fn descriptor(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn read(&self) -> Result<RawStateBlob> {
        if !self.path.is_file() {
            return Err(ExtractionError::StoreNotFound(self.path.clone()));
        }
        let envelope = self.read_auth_status()?;
        let value: Value = serde_json::from_slice(&envelope)?;
        let encoded = value
            .get(BINARY_FIELD)
            .and_then(Value::as_str)
            .ok_or(ExtractionError::MissingBinaryField)?;
        let bytes = STANDARD.decode(encoded.trim())?;
        tracing::debug!(
            store = %self.path.display(),
            bytes = bytes.len(),
            "decoded user status blob"
        );
        Ok(RawStateBlob(bytes))
    }

    fn read_auth_status(&self) -> Result<Vec<u8>> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let value = conn
            .query_row(
                "SELECT value FROM ItemTable WHERE key = ?1",
                params![AUTH_STATUS_KEY],
                |row| {
                    Ok(match row.get_ref(0)? {
                        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(bytes.to_vec()),
                        _ => None,
                    })
                },
            )
            .optional()?
            .flatten();
        match value {
            Some(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => Err(ExtractionError::NoAuthStatus),
        }
    }
}
