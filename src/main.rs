//! tau - task tracking CLI
//!
//! Tasks live as JSON files under the config directory, grouped into monthly
//! buckets. Open tasks are addressed by small recyclable ids.

use clap::Parser;
use tau::cli::Cli;
use tau::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let command = infer_command_name_from_args();
    let cli = Cli::parse();

    // Tracing is opt-in: RUST_LOG wins, -v turns on debug, otherwise off.
    // Ignore invalid/huge filters so startup never fails on them.
    let default_level = if cli.verbose { "tau=debug" } else { "off" };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(err) = cli.run() {
        if emit_error(&command, &err, json).is_err() {
            eprintln!("Error: {err}");
        }
        std::process::exit(err.exit_code());
    }
}
