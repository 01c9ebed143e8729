use std::time::Duration;

use crate::compare::Difference;
use crate::driver::Outcome;

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Two-line report for a completed comparison.
pub fn format_result(diff: &Difference, runtime: Duration) -> String {
    format!(
        "difference percentage:  {:.3} %\nruntime:                {}",
        diff.percent(),
        format_duration(runtime)
    )
}

pub fn format_timeout(timeout: Duration) -> String {
    format!("program timed out within {}", format_duration(timeout))
}

/// Print the outcome: results to stdout, failures to stderr.
pub fn print_outcome(outcome: &Outcome, runtime: Duration) {
    match outcome {
        Outcome::Completed(diff) => println!("{}", format_result(diff, runtime)),
        Outcome::TimedOut(timeout) => println!("{}", format_timeout(*timeout)),
        Outcome::Failed(e) => print_error(e),
    }
}

pub fn print_error(e: &anyhow::Error) {
    eprintln!("error: {e:#}");
}
