use std::path::PathBuf;

use gauge_scan::QuotaScanner;
use gauge_store::StateStore;

use crate::config::{self, AppConfig};
use crate::error::Result;
use crate::ledger::UsageLedger;
use crate::poll::{PollSettings, StoreProbe};
use crate::render::DashboardRenderer;
use crate::startup::AppPaths;

/// Resolved configuration shared by the CLI binaries.
#[derive(Clone, Debug)]
pub struct GaugeApp {
    pub config: AppConfig,
    pub paths: AppPaths,
    /// True when this run wrote a fresh default config file.
    pub created_config: bool,
}

impl GaugeApp {
    pub fn new(config: AppConfig, config_file: PathBuf) -> Self {
        let paths = AppPaths::resolve(config_file, &config);
        Self {
            config,
            paths,
            created_config: false,
        }
    }

    /// Loads (or creates) the config file and applies `GAUGE_*` overrides.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self> {
        let path = config::resolve_config_path(explicit, config::env_lookup);
        let loaded = config::load_or_create(&path)?;
        let mut config = loaded.config;
        config.apply_overrides(config::env_lookup)?;
        if loaded.created {
            tracing::info!(config = %loaded.path.display(), "wrote default config");
        }
        let mut app = Self::new(config, loaded.path);
        app.created_config = loaded.created;
        Ok(app)
    }

    pub fn state_store(&self) -> StateStore {
        StateStore::new(self.paths.store_path.clone())
    }

    pub fn scanner(&self) -> QuotaScanner {
        QuotaScanner::new(self.config.catalog.clone(), &self.config.scan)
    }

    pub fn probe(&self) -> StoreProbe {
        StoreProbe::new(self.state_store(), self.scanner())
    }

    pub fn open_ledger(&self) -> Result<UsageLedger> {
        Ok(UsageLedger::open(self.paths.ledger_path.clone())?)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings::from_config(&self.config)
    }

    pub fn renderer(&self, color: bool) -> DashboardRenderer {
        if color {
            DashboardRenderer::default()
        } else {
            DashboardRenderer::plain()
        }
    }
}
