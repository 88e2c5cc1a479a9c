//! # CLI Execution Functions
//!
//! Turns parsed arguments into validated configs and runs a variant.
//! Both variants exit 0 once they return; no error path exists past
//! argument validation.

use anyhow::{ensure, Result};
use clap::{Args, FromArgMatches};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};
use trialrace::{progress::StdoutSink, race, runner, RaceConfig, RunConfig};

use super::{RaceArgs, RunArgs};

impl From<&RunArgs> for RunConfig {
    fn from(args: &RunArgs) -> Self {
        RunConfig {
            limit: args.limit,
            report_every: args.report_every,
        }
    }
}

impl TryFrom<&RaceArgs> for RaceConfig {
    type Error = anyhow::Error;

    fn try_from(args: &RaceArgs) -> Result<Self> {
        ensure!(
            args.labels.len() == 2,
            "exactly two runner labels are required, got {}",
            args.labels.len()
        );
        let config = RaceConfig {
            run: RunConfig::from(&args.run),
            labels: [args.labels[0].clone(), args.labels[1].clone()],
            timeout: Duration::from_secs(args.timeout_secs),
            threads: args.threads,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Single-threaded variant: progress straight to stdout.
pub fn run_single(args: &RunArgs) -> Result<()> {
    let config = RunConfig::from(args);
    config.validate()?;
    let mut sink = StdoutSink;
    let summary = runner::run_range(&config, None, &mut sink)?;
    info!(tested = summary.tested, "single run complete");
    Ok(())
}

pub fn run_race(args: &RaceArgs) -> Result<()> {
    let config = RaceConfig::try_from(args)?;
    race_to_stdout(&config)
}

/// Race with no subcommand given: `race` arguments come from `TRIALRACE_*`
/// variables or fall back to the built-in values.
pub fn run_default_race() -> Result<()> {
    let args = default_race_args()?;
    run_race(&args)
}

fn default_race_args() -> Result<RaceArgs> {
    let matches =
        RaceArgs::augment_args(clap::Command::new("race")).try_get_matches_from(["race"])?;
    Ok(RaceArgs::from_arg_matches(&matches)?)
}

fn race_to_stdout(config: &RaceConfig) -> Result<()> {
    let mut out = std::io::stdout().lock();
    race::run_race(config, &mut out)?;
    if let Err(e) = out.flush() {
        debug!(error = %e, "stdout closed before exit");
    }
    // Runners still on the pool are abandoned; the process ends here.
    std::process::exit(0);
}
