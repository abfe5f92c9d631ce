mod clock;
mod flag;
mod source;

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use gauge_core::{
    DEFAULT_HIGH_TIER_MODEL, QuotaSnapshot, ResourceStatus, Thresholds, UsageLogEntry,
    status_for_snapshot,
};
use gauge_store::ExtractionError;

use crate::config::{
    AppConfig, DEFAULT_LOG_INTERVAL_MS, DEFAULT_REFRESH_INTERVAL_MS, DEFAULT_SYSTEM_LABEL,
};
use crate::ledger::UsageLedger;
use crate::render::DashboardRenderer;
use crate::terminal::Screen;

pub use clock::{Clock, ManualClock, SystemClock};
pub use flag::RunFlag;
pub use source::{SnapshotSource, StoreProbe};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub refresh_interval: Duration,
    pub log_interval: Duration,
    pub high_tier_model: String,
    pub thresholds: Thresholds,
    pub system_label: String,
}

impl PollSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            refresh_interval: Duration::from_millis(config.refresh_interval_ms),
            log_interval: Duration::from_millis(config.log_interval_ms),
            high_tier_model: config.high_tier_model.clone(),
            thresholds: config.thresholds,
            system_label: config.system_label.clone(),
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MS),
            log_interval: Duration::from_millis(DEFAULT_LOG_INTERVAL_MS),
            high_tier_model: DEFAULT_HIGH_TIER_MODEL.to_string(),
            thresholds: Thresholds::default(),
            system_label: DEFAULT_SYSTEM_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Running,
    Stopped,
}

/// Outcome of one read/scan/classify/render pass.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub snapshot: QuotaSnapshot,
    pub status: ResourceStatus,
    /// Set when the store could not be read and the Unknown status was shown.
    pub error: Option<String>,
    /// Ledger rows written during this tick.
    pub logged: usize,
}

/// Drives extraction, rendering and ledger writes.
///
/// Ticks run strictly one after another; the store is only touched inside
/// `SnapshotSource::snapshot` and never held between ticks.
pub struct Poller<S, C, O> {
    source: S,
    clock: C,
    screen: O,
    renderer: DashboardRenderer,
    settings: PollSettings,
    ledger: Option<UsageLedger>,
    session_id: String,
    last_log: Option<DateTime<Utc>>,
    state: PollState,
    ticks: u64,
}

impl<S, C, O> Poller<S, C, O>
where
    S: SnapshotSource,
    C: Clock,
    O: Screen,
{
    pub fn new(
        source: S,
        clock: C,
        screen: O,
        renderer: DashboardRenderer,
        settings: PollSettings,
    ) -> Self {
        let session_id = format!("session-{}", clock.now().timestamp_millis());
        Self {
            source,
            clock,
            screen,
            renderer,
            settings,
            ledger: None,
            session_id,
            last_log: None,
            state: PollState::Stopped,
            ticks: 0,
        }
    }

    pub fn with_ledger(mut self, ledger: UsageLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn screen(&self) -> &O {
        &self.screen
    }

    pub fn ledger(&self) -> Option<&UsageLedger> {
        self.ledger.as_ref()
    }

    /// Single pass for the one-shot status command.
    ///
    /// A store that exists but has not published quota data yet renders the
    /// Unknown status; every other extraction failure is returned.
    pub fn run_once(&mut self) -> Result<TickReport, ExtractionError> {
        let now = self.clock.now();
        self.ticks += 1;
        let report = match self.source.snapshot(now) {
            Ok(snapshot) => {
                let status = self.classify(&snapshot);
                TickReport {
                    snapshot,
                    status,
                    error: None,
                    logged: 0,
                }
            }
            Err(err) if err.is_missing_data() => self.unknown_report(&err, now),
            Err(err) => return Err(err),
        };
        self.present(&report);
        Ok(report)
    }

    /// Polls until `flag` is cleared. The tick in progress when the flag
    /// flips is allowed to finish.
    pub async fn run(&mut self, flag: &RunFlag) {
        self.state = PollState::Running;
        self.last_log = Some(self.clock.now());
        tracing::info!(
            refresh_ms = self.settings.refresh_interval.as_millis() as u64,
            log_ms = self.settings.log_interval.as_millis() as u64,
            session = %self.session_id,
            "poll loop started"
        );
        while flag.is_running() {
            self.tick();
            if !flag.is_running() {
                break;
            }
            tokio::select! {
                _ = self.clock.sleep(self.settings.refresh_interval) => {}
                _ = flag.stopped() => {}
            }
        }
        self.state = PollState::Stopped;
        tracing::info!(ticks = self.ticks, "poll loop stopped");
    }

    /// One continuous-mode tick. Extraction failures are shown and reported,
    /// never returned.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        self.ticks += 1;
        match self.source.snapshot(now) {
            Ok(snapshot) => {
                let status = self.classify(&snapshot);
                let mut report = TickReport {
                    snapshot,
                    status,
                    error: None,
                    logged: 0,
                };
                self.present(&report);
                if self.take_log_slot(now) {
                    report.logged = self.log_snapshot(&report.snapshot);
                }
                report
            }
            Err(err) => {
                tracing::debug!(tick = self.ticks, "quota read failed: {}", err);
                let report = self.unknown_report(&err, now);
                self.present(&report);
                self.screen.report(&format!("Dashboard error: {err}"));
                report
            }
        }
    }

    fn classify(&self, snapshot: &QuotaSnapshot) -> ResourceStatus {
        status_for_snapshot(
            snapshot,
            &self.settings.high_tier_model,
            self.settings.thresholds,
        )
    }

    fn unknown_report(&self, err: &ExtractionError, now: DateTime<Utc>) -> TickReport {
        TickReport {
            snapshot: QuotaSnapshot {
                timestamp: now,
                records: Vec::new(),
                source: self.source.descriptor(),
            },
            status: ResourceStatus::unknown(err.to_string(), now),
            error: Some(err.to_string()),
            logged: 0,
        }
    }

    fn present(&mut self, report: &TickReport) {
        let updated_at = self.clock.now().with_timezone(&Local);
        let frame = self
            .renderer
            .render(&report.snapshot, &report.status, updated_at);
        if let Err(err) = self.screen.draw(&frame) {
            tracing::warn!("failed to draw dashboard: {}", err);
        }
    }

    /// True when a ledger write is due; the first call only starts the clock.
    fn take_log_slot(&mut self, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_log else {
            self.last_log = Some(now);
            return false;
        };
        let interval = chrono::Duration::from_std(self.settings.log_interval)
            .unwrap_or(chrono::Duration::MAX);
        if now.signed_duration_since(last) < interval {
            return false;
        }
        self.last_log = Some(now);
        true
    }

    fn log_snapshot(&mut self, snapshot: &QuotaSnapshot) -> usize {
        let Some(ledger) = self.ledger.as_mut() else {
            return 0;
        };
        let mut written = 0;
        for record in &snapshot.records {
            let Some(entry) = UsageLogEntry::from_record(
                record,
                snapshot.timestamp,
                &self.session_id,
                &self.settings.system_label,
            ) else {
                continue;
            };
            if let Err(err) = ledger.append(&entry) {
                tracing::warn!(ledger = %ledger.path().display(), "ledger append failed: {}", err);
                self.screen.report(&format!("Ledger error: {err}"));
                break;
            }
            written += 1;
        }
        tracing::debug!(rows = written, "ledger updated");
        written
    }
}
