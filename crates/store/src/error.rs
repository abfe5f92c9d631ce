use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("state store not found at {}", .0.display())]
    StoreNotFound(PathBuf),
    #[error("no auth status found")]
    NoAuthStatus,
    #[error("auth status envelope is not valid json: {0}")]
    EnvelopeParse(#[from] serde_json::Error),
    #[error("no user status binary found")]
    MissingBinaryField,
    #[error("user status binary is not valid base64: {0}")]
    Base64Decode(#[from] base64::DecodeError),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl ExtractionError {
    /// The store was readable but has not published quota data yet.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Self::NoAuthStatus | Self::MissingBinaryField)
    }
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
