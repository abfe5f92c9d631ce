use std::path::PathBuf;

pub const STORE_FILE_NAME: &str = "state.vscdb";

/// `<config dir>/Antigravity/User/globalStorage/state.vscdb`, i.e. under
/// `%APPDATA%` on Windows and `~/.config` on Linux.
pub fn default_store_path() -> PathBuf {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("Antigravity")
        .join("User")
        .join("globalStorage")
        .join(STORE_FILE_NAME)
}
