//! # Race — Two Runners, One Printer, One Deadline
//!
//! Spawns two labelled Range Runners on a dedicated rayon pool, each with
//! its own channel, and relays whatever line arrives first to the output.
//! A runner stays blocked on its line until the aggregator has written it
//! and released the `Handoff`. The loop ends only when the deadline fixed
//! at loop start passes; runners still working then are abandoned.
//!
//! A runner that finishes closes its channel. The matching `select!` branch
//! is then switched off instead of being polled again, so two finished
//! runners leave the loop parked on the deadline alone.
//!
//! Output failures (a closed stdout, say) are logged and skipped: the loop
//! always reaches the deadline.

use crate::config::RaceConfig;
use crate::progress::{ChannelSink, Handoff};
use crate::runner;
use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Final line of every race.
pub const TIME_IS_UP: &str = "Time is up";

/// How a race loop ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaceOutcome {
    /// Progress lines taken from the runners before the deadline.
    pub relayed: u64,
    /// Runners whose channel had closed by the deadline.
    pub finished_runners: usize,
}

/// Write one line and flush, logging instead of failing.
fn write_line<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
        debug!(error = %e, "output closed, line dropped");
    }
}

/// Relay lines from `first` and `second` to `out` until `timeout` has passed
/// since this call began, then write the time-up notice.
pub async fn aggregate<W: Write>(
    mut first: mpsc::Receiver<Handoff>,
    mut second: mpsc::Receiver<Handoff>,
    timeout: Duration,
    out: &mut W,
) -> RaceOutcome {
    let deadline = sleep_until(Instant::now() + timeout);
    tokio::pin!(deadline);

    let mut first_open = true;
    let mut second_open = true;
    let mut relayed = 0u64;

    loop {
        tokio::select! {
            msg = first.recv(), if first_open => match msg {
                Some(handoff) => {
                    write_line(out, &handoff.line);
                    handoff.release();
                    relayed += 1;
                }
                None => {
                    debug!("first runner closed its channel");
                    first_open = false;
                }
            },
            msg = second.recv(), if second_open => match msg {
                Some(handoff) => {
                    write_line(out, &handoff.line);
                    handoff.release();
                    relayed += 1;
                }
                None => {
                    debug!("second runner closed its channel");
                    second_open = false;
                }
            },
            _ = &mut deadline => {
                write_line(out, TIME_IS_UP);
                let finished_runners = usize::from(!first_open) + usize::from(!second_open);
                return RaceOutcome { relayed, finished_runners };
            }
        }
    }
}

/// Run the concurrent variant: both runners on a `config.threads`-wide
/// pool, lines relayed to `out`, returns once the deadline has passed.
pub fn run_race<W: Write>(config: &RaceConfig, out: &mut W) -> Result<RaceOutcome> {
    config.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|i| format!("trialrace-runner-{}", i))
        .build()?;
    info!(
        threads = config.threads,
        limit = config.run.limit,
        timeout_secs = config.timeout.as_secs_f64(),
        first = %config.labels[0],
        second = %config.labels[1],
        "race starting"
    );

    let (first_tx, first_rx) = mpsc::channel::<Handoff>(1);
    let (second_tx, second_rx) = mpsc::channel::<Handoff>(1);
    for (label, tx) in config.labels.iter().zip([first_tx, second_tx]) {
        let run = config.run.clone();
        let label = label.clone();
        pool.spawn(move || {
            let mut sink = ChannelSink::new(tx, label.clone());
            if let Err(e) = runner::run_range(&run, Some(&label), &mut sink) {
                warn!(label = %label, error = %e, "runner did not start");
            }
        });
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = rt.block_on(aggregate(first_rx, second_rx, config.timeout, out));

    info!(
        relayed = outcome.relayed,
        finished_runners = outcome.finished_runners,
        "race deadline reached"
    );
    Ok(outcome)
}
