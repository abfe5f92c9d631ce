use std::process::ExitCode;

use clap::Parser;
use gauge_app::{GaugeApp, UsageLedger};
use gauge_cli::args::{LedgerArgs, LedgerCommand};
use gauge_cli::logging;
use gauge_core::LedgerSummary;

fn main() -> ExitCode {
    let args = LedgerArgs::parse();
    logging::init("info");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: LedgerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let app = GaugeApp::load(args.common.config)?;
    let mut ledger = UsageLedger::open(app.paths.ledger_path.clone())?;
    match args.command {
        LedgerCommand::Summary { json } => {
            let summary = ledger.summarize()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&ledger, &summary);
            }
        }
        LedgerCommand::Rotate => {
            let archive = ledger.rotate()?;
            println!("Archived {} to {}", ledger.path().display(), archive.display());
        }
    }
    Ok(())
}

fn print_summary(ledger: &UsageLedger, summary: &LedgerSummary) {
    println!("Ledger: {}", ledger.path().display());
    println!("Entries: {}", summary.total_entries);
    println!("Tokens:  {}", summary.total_tokens);
    if let (Some(first), Some(last)) = (&summary.first_entry, &summary.last_entry) {
        println!("Span:    {first} .. {last}");
    }
    for (title, buckets) in [("By model", &summary.by_model), ("By system", &summary.by_system)] {
        if buckets.is_empty() {
            continue;
        }
        println!();
        println!("{title}:");
        for (name, bucket) in buckets {
            println!("  {name:<32} {:>6} rows {:>12} tokens", bucket.count, bucket.tokens);
        }
    }
}
