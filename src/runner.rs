//! # Runner — Range Runner and Per-Run State
//!
//! `run_range` tests every integer in `[1, limit)` in ascending order and
//! throws the answers away; the only thing a run produces is progress lines.
//!
//! Each run owns a `RunState`: its own step counter and timing marks. Two
//! racing runners never share a counter, so the iteration figure in a line
//! is that runner's own work.

use crate::config::RunConfig;
use crate::progress::{ProgressReport, ProgressSink};
use crate::trial;
use anyhow::Result;
use std::num::NonZeroU64;
use std::time::{Duration, Instant};
use tracing::info;

/// Counter and timing marks of a single run.
#[derive(Debug)]
pub struct RunState {
    iterations: u64,
    reports: u64,
    report_every: NonZeroU64,
    start: Instant,
    last_report: Instant,
    label: Option<String>,
}

impl RunState {
    pub fn new(report_every: NonZeroU64, label: Option<&str>) -> Self {
        let now = Instant::now();
        RunState {
            iterations: 0,
            reports: 0,
            report_every,
            start: now,
            last_report: now,
            label: label.map(str::to_owned),
        }
    }

    /// Restart both timing marks. The counter is left alone.
    pub fn reset_marks(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_report = now;
    }

    /// Trial-division steps taken so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Progress lines emitted so far.
    pub fn reports(&self) -> u64 {
        self.reports
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Count one trial-division step on `value`, emitting a line when the
    /// counter lands on a multiple of the report interval.
    pub(crate) fn step(&mut self, value: u64, sink: &mut dyn ProgressSink) {
        self.iterations += 1;
        if self.iterations % self.report_every.get() != 0 {
            return;
        }
        let now = Instant::now();
        let line = ProgressReport {
            elapsed_total: now - self.start,
            elapsed_since_last: now - self.last_report,
            label: self.label.as_deref(),
            iteration: self.iterations,
            value,
        }
        .to_string();
        sink.emit(line);
        // The hand-off may have blocked; the next interval starts after it.
        self.last_report = Instant::now();
        self.reports += 1;
    }
}

/// What a finished run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub label: Option<String>,
    pub tested: u64,
    pub iterations: u64,
    pub reports: u64,
    pub elapsed: Duration,
}

/// Test every value in `[1, config.limit)`, sending progress to `sink`.
/// Fails only on an invalid config, before any value is tested.
pub fn run_range(
    config: &RunConfig,
    label: Option<&str>,
    sink: &mut dyn ProgressSink,
) -> Result<RunSummary> {
    let mut state = RunState::new(config.report_interval()?, label);
    info!(
        label = label.unwrap_or("-"),
        limit = config.limit,
        report_every = config.report_every,
        "range run starting"
    );

    state.reset_marks();
    let mut tested = 0u64;
    for value in 1..config.limit {
        let _ = trial::is_prime_tracked(value, &mut state, sink);
        tested += 1;
    }

    let summary = RunSummary {
        label: state.label().map(str::to_owned),
        tested,
        iterations: state.iterations(),
        reports: state.reports(),
        elapsed: state.elapsed(),
    };
    info!(
        label = label.unwrap_or("-"),
        tested = summary.tested,
        iterations = summary.iterations,
        reports = summary.reports,
        elapsed_secs = format_args!("{:.3}", summary.elapsed.as_secs_f64()),
        "range run finished"
    );
    Ok(summary)
}
