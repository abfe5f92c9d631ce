use std::fs;
use std::path::{Path, PathBuf};

use gauge_core::{DEFAULT_HIGH_TIER_MODEL, Thresholds, default_catalog};
use gauge_scan::ScanConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const CONFIG_DIR_NAME: &str = "quota-gauge";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_LOG_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_SYSTEM_LABEL: &str = "quota-gauge";

pub const ENV_CONFIG: &str = "GAUGE_CONFIG";
pub const ENV_STORE_PATH: &str = "GAUGE_STORE_PATH";
pub const ENV_LEDGER_PATH: &str = "GAUGE_LEDGER_PATH";
pub const ENV_REFRESH_INTERVAL_MS: &str = "GAUGE_REFRESH_INTERVAL_MS";
pub const ENV_LOG_INTERVAL_MS: &str = "GAUGE_LOG_INTERVAL_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dashboard tick cadence.
    pub refresh_interval_ms: u64,
    /// Ledger write cadence.
    pub log_interval_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_path: Option<PathBuf>,
    pub high_tier_model: String,
    pub system_label: String,
    pub catalog: Vec<String>,
    pub thresholds: Thresholds,
    pub scan: ScanConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            log_interval_ms: DEFAULT_LOG_INTERVAL_MS,
            store_path: None,
            ledger_path: None,
            high_tier_model: DEFAULT_HIGH_TIER_MODEL.to_string(),
            system_label: DEFAULT_SYSTEM_LABEL.to_string(),
            catalog: default_catalog(),
            thresholds: Thresholds::default(),
            scan: ScanConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: AppConfig,
    pub path: PathBuf,
    pub created: bool,
}

impl AppConfig {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Environment overrides, looked up through `lookup` so tests need not
    /// touch the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_STORE_PATH).filter(|value| !value.is_empty()) {
            self.store_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(ENV_LEDGER_PATH).filter(|value| !value.is_empty()) {
            self.ledger_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(ENV_REFRESH_INTERVAL_MS) {
            self.refresh_interval_ms = parse_millis(ENV_REFRESH_INTERVAL_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_LOG_INTERVAL_MS) {
            self.log_interval_ms = parse_millis(ENV_LOG_INTERVAL_MS, &value)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(invalid("refresh_interval_ms must be greater than 0"));
        }
        if self.log_interval_ms == 0 {
            return Err(invalid("log_interval_ms must be greater than 0"));
        }
        if self.catalog.iter().all(|name| name.is_empty()) {
            return Err(invalid("catalog must name at least one model"));
        }
        if self.high_tier_model.is_empty() {
            return Err(invalid("high_tier_model must not be empty"));
        }
        if self.scan.marker.is_empty() {
            return Err(invalid("scan.marker must not be empty"));
        }
        if self.scan.window == 0 {
            return Err(invalid("scan.window must be greater than 0"));
        }
        if self.scan.max_varint_bytes == 0 {
            return Err(invalid("scan.max_varint_bytes must be greater than 0"));
        }
        Ok(())
    }
}

/// Reads the config at `path`, writing the defaults there first if missing.
pub fn load_or_create(path: &Path) -> Result<ConfigLoad> {
    if path.exists() {
        let config = AppConfig::load(path).map_err(|err| match err {
            AppError::ConfigParse(err) => {
                AppError::InvalidConfig(format!("parse config {}: {}", path.display(), err))
            }
            other => other,
        })?;
        return Ok(ConfigLoad {
            config,
            path: path.to_path_buf(),
            created: false,
        });
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let config = AppConfig::default();
    fs::write(path, toml::to_string_pretty(&config)?)?;
    Ok(ConfigLoad {
        config,
        path: path.to_path_buf(),
        created: true,
    })
}

/// Explicit path, then `GAUGE_CONFIG`, then the per-user config dir.
pub fn resolve_config_path<F>(explicit: Option<PathBuf>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return path;
    }
    if let Some(path) = lookup(ENV_CONFIG).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid(&format!("{key} must be a whole number of milliseconds, got {value:?}")))
}

fn invalid(message: &str) -> AppError {
    AppError::InvalidConfig(message.to_string())
}
