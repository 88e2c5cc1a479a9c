//! # Trial — Brute-Force Primality Test
//!
//! Divides by every `i` in `2..=value/2` and stops at the first divisor.
//! No sieve, no square-root bound, no even shortcut: the step count is part
//! of the observable behavior because progress lines are keyed on it.

use crate::progress::ProgressSink;
use crate::runner::RunState;

/// True iff `value` is prime. Values below 2 are never prime.
pub fn is_prime(value: u64) -> bool {
    (2..=value / 2).all(|i| value % i != 0) && value > 1
}

/// Same answer as [`is_prime`], counting each division step on `state` and
/// emitting a progress line to `sink` every `report_every` steps.
pub fn is_prime_tracked(value: u64, state: &mut RunState, sink: &mut dyn ProgressSink) -> bool {
    for i in 2..=value / 2 {
        state.step(value, sink);
        if value % i == 0 {
            return false;
        }
    }
    value > 1
}
