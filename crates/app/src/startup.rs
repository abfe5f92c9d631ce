use std::path::PathBuf;

use gauge_store::default_store_path;

use crate::config::{AppConfig, CONFIG_DIR_NAME};

pub const LEDGER_FILE_NAME: &str = "token_usage.csv";

/// Files the gauge reads and writes, after config and env overrides.
#[derive(Clone, Debug)]
pub struct AppPaths {
    pub config_file: PathBuf,
    pub store_path: PathBuf,
    pub ledger_path: PathBuf,
}

impl AppPaths {
    pub fn resolve(config_file: PathBuf, config: &AppConfig) -> Self {
        let store_path = config
            .store_path
            .clone()
            .unwrap_or_else(default_store_path);
        let ledger_path = config
            .ledger_path
            .clone()
            .unwrap_or_else(default_ledger_path);
        Self {
            config_file,
            store_path,
            ledger_path,
        }
    }
}

pub fn default_ledger_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(LEDGER_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_paths_win() {
        let config = AppConfig {
            store_path: Some(PathBuf::from("/data/state.vscdb")),
            ledger_path: Some(PathBuf::from("/data/usage.csv")),
            ..AppConfig::default()
        };
        let paths = AppPaths::resolve(PathBuf::from("/etc/gauge.toml"), &config);
        assert_eq!(paths.store_path, PathBuf::from("/data/state.vscdb"));
        assert_eq!(paths.ledger_path, PathBuf::from("/data/usage.csv"));
        assert_eq!(paths.config_file, PathBuf::from("/etc/gauge.toml"));
    }

    #[test]
    fn defaults_fill_missing_paths() {
        let paths = AppPaths::resolve(PathBuf::from("c.toml"), &AppConfig::default());
        assert!(paths.store_path.ends_with("state.vscdb"));
        assert!(paths.ledger_path.ends_with("quota-gauge/token_usage.csv"));
    }
}
