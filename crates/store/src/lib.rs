mod error;
mod paths;
mod reader;

pub use error::{ExtractionError, Result};
pub use paths::{STORE_FILE_NAME, default_store_path};
pub use reader::{AUTH_STATUS_KEY, BINARY_FIELD, RawStateBlob, StateStore};
