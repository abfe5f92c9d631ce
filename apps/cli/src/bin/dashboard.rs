use std::process::ExitCode;

use clap::Parser;
use gauge_app::{GaugeApp, Poller, RunFlag, SystemClock, TerminalScreen};
use gauge_cli::args::DashboardArgs;
use gauge_cli::{logging, shutdown};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = DashboardArgs::parse();
    logging::init("warn");

    let app = match GaugeApp::load(args.common.config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if app.created_config {
        eprintln!("Created config at {}", app.paths.config_file.display());
    }

    let ledger = if args.no_ledger {
        None
    } else {
        match app.open_ledger() {
            Ok(ledger) => Some(ledger),
            Err(err) => {
                tracing::warn!(
                    ledger = %app.paths.ledger_path.display(),
                    "usage ledger disabled: {}",
                    err
                );
                None
            }
        }
    };

    let flag = RunFlag::new();
    let signals = shutdown::install(flag.clone());

    let screen = TerminalScreen::acquire();
    let color = screen.is_interactive() && !args.plain;
    let mut poller = Poller::new(
        app.probe(),
        SystemClock,
        screen,
        app.renderer(color),
        app.poll_settings(),
    );
    if let Some(ledger) = ledger {
        poller = poller.with_ledger(ledger);
    }

    poller.run(&flag).await;
    signals.abort();
    // Dropping the poller drops the screen, which shows the cursor again.
    drop(poller);
    println!("Dashboard stopped.");
    ExitCode::SUCCESS
}
