//! # Progress — Report Lines and Where They Go
//!
//! A `ProgressReport` is one status line produced by the tester every
//! `report_every` trial-division steps. It renders in one of two formats:
//!
//! | Variant | Line |
//! |---------|------|
//! | single  | `<total:.3> Iteration <n>, examining <value>` |
//! | race    | `<total:.3> <since_last:.3> <label> Iteration <n>, examining <value>` |
//!
//! ## Sinks
//!
//! The tester hands finished lines to a `ProgressSink`. The single-threaded
//! variant prints straight to stdout. Race runners pass each line to the
//! aggregator as a `Handoff` and stall until the aggregator releases it
//! after printing, so a runner is never ahead of the output.

use std::fmt;
use std::io::Write;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// One progress event, borrowed from the runner that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressReport<'a> {
    pub elapsed_total: Duration,
    pub elapsed_since_last: Duration,
    /// `None` selects the single-threaded line format.
    pub label: Option<&'a str>,
    pub iteration: u64,
    pub value: u64,
}

impl fmt::Display for ProgressReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.elapsed_total.as_secs_f64();
        match self.label {
            Some(label) => write!(
                f,
                "{:.3} {:.3} {} Iteration {}, examining {}",
                total,
                self.elapsed_since_last.as_secs_f64(),
                label,
                self.iteration,
                self.value
            ),
            None => write!(
                f,
                "{:.3} Iteration {}, examining {}",
                total, self.iteration, self.value
            ),
        }
    }
}

/// Destination for formatted progress lines.
pub trait ProgressSink {
    /// Hand off one line. Returns once the line has been delivered (or
    /// dropped because nobody is listening any more).
    fn emit(&mut self, line: String);
}

/// Prints each line to stdout.
#[derive(Default)]
pub struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn emit(&mut self, line: String) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line) {
            debug!(error = %e, "stdout closed, progress line dropped");
        }
    }
}

/// A line in transit from a runner to the aggregator, together with the
/// signal that lets the runner carry on.
#[derive(Debug)]
pub struct Handoff {
    pub line: String,
    taken: oneshot::Sender<()>,
}

impl Handoff {
    /// Wrap `line`; the receiver resolves once the handoff is released.
    pub fn new(line: String) -> (Self, oneshot::Receiver<()>) {
        let (taken, rx) = oneshot::channel();
        (Handoff { line, taken }, rx)
    }

    /// Mark the line as consumed, unblocking the runner that sent it.
    pub fn release(self) {
        let _ = self.taken.send(());
    }
}

/// Hands each line to the aggregator and blocks the calling (non-async)
/// thread until the aggregator has released it.
pub struct ChannelSink {
    tx: mpsc::Sender<Handoff>,
    label: String,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Handoff>, label: impl Into<String>) -> Self {
        ChannelSink {
            tx,
            label: label.into(),
        }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, line: String) {
        let (handoff, taken) = Handoff::new(line);
        if self.tx.blocking_send(handoff).is_err() {
            debug!(label = %self.label, "aggregator gone, progress line dropped");
            return;
        }
        if taken.blocking_recv().is_err() {
            debug!(label = %self.label, "aggregator dropped line without releasing it");
        }
    }
}

impl ProgressSink for Vec<String> {
    fn emit(&mut self, line: String) {
        self.push(line);
    }
}
