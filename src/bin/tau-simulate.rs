//! tau-simulate - fill a tau store with synthetic tasks
//!
//! Creates randomized tasks through the regular service and walks each one
//! through weighted lifecycle actions. Pass `--seed` to reproduce a run.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tau::clock::Clock;
use tau::config::{self, Config};
use tau::output::{emit_success, HumanOutput, OutputOptions};
use tau::service::TaskService;
use tau::simulate::{self, SimulationOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Generate fake tasks with plausible content
#[derive(Parser, Debug)]
#[command(name = "tau-simulate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Storage root (defaults to ~/.config/tau)
    #[arg(long, env = "TAU_CONFIG_PATH")]
    config_path: Option<PathBuf>,

    /// Number of tasks to create
    #[arg(long, default_value_t = 19)]
    count: usize,

    /// Maximum lifecycle actions per task
    #[arg(long, default_value_t = 3)]
    steps: usize,

    /// Random seed (drawn at random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Pin the start time (RFC 3339)
    #[arg(long, env = "TAU_NOW", hide = true)]
    now: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Same policy as `tau`: RUST_LOG wins, -v turns on debug, otherwise off.
    let default_level = if args.verbose { "tau=debug" } else { "off" };
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

    let root = config::resolve_root(args.config_path.as_deref())?;
    let config = Config::load_from_root(&root);
    let service = TaskService::open(&root, &config)
        .with_context(|| format!("failed to open store at {}", root.display()))?;
    let clock = Clock::from_override(args.now.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::debug!(seed, root = %root.display(), "simulation starting");

    let summary = simulate::run(
        &service,
        SimulationOptions {
            count: args.count,
            steps: args.steps,
        },
        seed,
        clock.now(),
        clock.today(),
    )
    .context("simulation failed")?;

    let mut human = HumanOutput::new(format!(
        "Created {} synthetic tasks in {}",
        summary.created,
        root.display()
    ));
    human.push_summary("seed", summary.seed.to_string());
    human.push_summary("transitions", summary.transitions.to_string());
    for (state, count) in &summary.final_states {
        human.push_summary(format!("final {state}"), count.to_string());
    }

    emit_success(
        OutputOptions {
            json: args.json,
            quiet: false,
        },
        "simulate",
        &summary,
        Some(&human),
    )?;
    Ok(())
}
