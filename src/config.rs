//! # Config — Run Parameters
//!
//! Named constants for every fixed figure the runners use, plus the two
//! parameter structs built from them. `Default` reproduces the constants
//! exactly; the CLI only overrides what the user passes.

use anyhow::{anyhow, ensure, Result};
use std::num::NonZeroU64;
use std::time::Duration;

/// Trial-division steps between two progress lines.
pub const REPORT_EVERY: u64 = 100_000_000;

/// Exclusive upper end of the tested range `[1, limit)`.
pub const DEFAULT_LIMIT: u64 = 100_000;

/// Wall-clock budget of the race loop.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Worker threads in the race pool.
pub const DEFAULT_THREADS: usize = 4;

/// Labels of the two concurrent runners.
pub const DEFAULT_LABELS: [&str; 2] = ["stuffs", "niceness"];

/// Parameters of one Range Runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub limit: u64,
    pub report_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            limit: DEFAULT_LIMIT,
            report_every: REPORT_EVERY,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        self.report_interval().map(|_| ())
    }

    /// The report interval, rejecting zero.
    pub fn report_interval(&self) -> Result<NonZeroU64> {
        NonZeroU64::new(self.report_every)
            .ok_or_else(|| anyhow!("report interval must be at least 1 step"))
    }
}

/// Parameters of the concurrent variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaceConfig {
    pub run: RunConfig,
    pub labels: [String; 2],
    pub timeout: Duration,
    pub threads: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            run: RunConfig::default(),
            labels: DEFAULT_LABELS.map(String::from),
            timeout: DEFAULT_TIMEOUT,
            threads: DEFAULT_THREADS,
        }
    }
}

impl RaceConfig {
    pub fn validate(&self) -> Result<()> {
        self.run.validate()?;
        ensure!(self.threads > 0, "race pool needs at least one thread");
        ensure!(!self.timeout.is_zero(), "timeout must be greater than zero");
        for label in &self.labels {
            ensure!(!label.trim().is_empty(), "runner labels must not be empty");
        }
        ensure!(
            self.labels[0] != self.labels[1],
            "runner labels must differ (both are {:?})",
            self.labels[0]
        );
        Ok(())
    }
}
