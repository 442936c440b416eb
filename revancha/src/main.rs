mod coverage;
mod info;
mod inputs;
mod options;
mod profiles;
mod progress;
mod summary;
mod width;

use anyhow::Result;
use clap::Parser;
use options::Cli;
use serde::Serialize;
use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli {
        Cli::Info(info) => info.run(),
        Cli::Coverage(coverage) => coverage.run(),
        Cli::Profiles(profiles) => profiles.run(),
        Cli::Width(width) => width.run(),
        Cli::Summary(summary) => summary.run(),
    }
}

/// Pretty-prints `value` as JSON to stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
