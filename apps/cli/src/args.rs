use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Config file to use instead of GAUGE_CONFIG or the per-user default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Print the current quota status once and exit
#[derive(Debug, Parser)]
#[command(name = "gauge-status", version)]
pub struct StatusArgs {
    #[command(flatten)]
    pub common: ConfigArgs,

    /// Print the resource status as JSON instead of the dashboard
    #[arg(long, conflicts_with = "plain")]
    pub json: bool,

    /// Disable colors
    #[arg(long)]
    pub plain: bool,
}

/// Live quota dashboard; stop with Ctrl+C
#[derive(Debug, Parser)]
#[command(name = "gauge-dashboard", version)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub common: ConfigArgs,

    /// Disable colors
    #[arg(long)]
    pub plain: bool,

    /// Do not write snapshots to the usage ledger
    #[arg(long)]
    pub no_ledger: bool,
}

/// Usage ledger maintenance
#[derive(Debug, Parser)]
#[command(name = "gauge-ledger", version)]
pub struct LedgerArgs {
    #[command(flatten)]
    pub common: ConfigArgs,

    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Totals per model and per system
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Archive the current ledger under archive/ and start a new one
    Rotate,
}
