pub mod terminal;

use crate::driver::Outcome;

/// Exit code for invalid arguments, unreadable inputs, and mismatched dimensions.
pub const EXIT_INVALID: i32 = 101;
/// Exit code when the deadline passed before a score was produced.
pub const EXIT_TIMEOUT: i32 = 102;

/// Process exit code for a finished run.
///
/// A completed comparison exits with the floor of its percentage, `0..=100`.
pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Completed(diff) => i32::from(diff.percent_floor()),
        Outcome::TimedOut(_) => EXIT_TIMEOUT,
        Outcome::Failed(_) => EXIT_INVALID,
    }
}
