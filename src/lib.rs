//! Trial-division primality runs with progress reporting.
//!
//! The single-threaded variant walks `[1, limit)` and prints a line every
//! `report_every` division steps. The race variant runs two labelled copies
//! on a small rayon pool and relays their lines until a fixed deadline.

pub mod config;
pub mod progress;
pub mod race;
pub mod runner;
pub mod trial;

pub use config::{RaceConfig, RunConfig};
pub use progress::{ProgressReport, ProgressSink};
pub use race::{run_race, RaceOutcome};
pub use runner::{run_range, RunState, RunSummary};
pub use trial::{is_prime, is_prime_tracked};
