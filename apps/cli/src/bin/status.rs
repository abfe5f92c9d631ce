use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use gauge_app::{GaugeApp, Poller, SystemClock};
use gauge_cli::args::StatusArgs;
use gauge_cli::logging;
use gauge_cli::output::PrintScreen;

fn main() -> ExitCode {
    let args = StatusArgs::parse();
    logging::init("info");

    let app = match GaugeApp::load(args.common.config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let screen = if args.json {
        PrintScreen::quiet()
    } else {
        PrintScreen::new()
    };
    let color = !args.plain && !args.json && std::io::stdout().is_terminal();
    let mut poller = Poller::new(
        app.probe(),
        SystemClock,
        screen,
        app.renderer(color),
        app.poll_settings(),
    );

    let report = match poller.run_once() {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(reason) = &report.error {
        tracing::warn!("quota data unavailable: {}", reason);
    }
    if args.json {
        match serde_json::to_string_pretty(&report.status) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
