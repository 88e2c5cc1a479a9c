//! # Main — CLI Entry Point
//!
//! Parses the command line, sets up logging, and hands off to the
//! single-threaded or race variant in `cli`.
//!
//! ## Environment
//!
//! - `.env` is loaded first, so any flag's `TRIALRACE_*` variable can live there.
//!   Running with no subcommand parses the `race` arguments from these
//!   variables alone.
//! - `LOG_FORMAT=json`: JSON log lines instead of human-readable ones.
//! - `RUST_LOG`: log filter (default `info`). Logs go to stderr; stdout only
//!   carries progress lines and the time-up notice.

mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use trialrace::config::{
    DEFAULT_LABELS, DEFAULT_LIMIT, DEFAULT_THREADS, DEFAULT_TIMEOUT, REPORT_EVERY,
};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "trialrace",
    about = "Brute-force primality runs with periodic progress lines"
)]
struct Cli {
    /// Variant to run (defaults to `race`, configured from the environment)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Test one range on the current thread, printing progress to stdout
    Single {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Race two labelled runners against a wall-clock deadline
    Race(RaceArgs),
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Exclusive upper end of the tested range [1, limit)
    #[arg(long, env = "TRIALRACE_LIMIT", default_value_t = DEFAULT_LIMIT)]
    limit: u64,

    /// Trial-division steps between progress lines
    #[arg(long, env = "TRIALRACE_REPORT_EVERY", default_value_t = REPORT_EVERY)]
    report_every: u64,
}

#[derive(Args, Clone)]
struct RaceArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Seconds from loop start until "Time is up"
    #[arg(long, env = "TRIALRACE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Worker threads in the runner pool
    #[arg(long, env = "TRIALRACE_THREADS", default_value_t = DEFAULT_THREADS)]
    threads: usize,

    /// Labels of the two runners, comma separated
    #[arg(
        long,
        env = "TRIALRACE_LABELS",
        value_delimiter = ',',
        default_values = DEFAULT_LABELS
    )]
    labels: Vec<String>,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Logs never touch stdout: it belongs to the progress lines.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Single { run }) => cli::run_single(run),
        Some(Commands::Race(args)) => cli::run_race(args),
        None => cli::run_default_race(),
    }
}
