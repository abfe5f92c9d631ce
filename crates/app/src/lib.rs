pub mod app;
pub mod config;
pub mod error;
pub mod ledger;
pub mod poll;
pub mod render;
pub mod startup;
pub mod terminal;

pub use app::GaugeApp;
pub use config::{AppConfig, ConfigLoad};
pub use error::{AppError, Result};
pub use ledger::UsageLedger;
pub use poll::{
    Clock, ManualClock, PollSettings, PollState, Poller, RunFlag, SnapshotSource, StoreProbe,
    SystemClock, TickReport,
};
pub use render::DashboardRenderer;
pub use startup::AppPaths;
pub use terminal::{Screen, TerminalScreen};
