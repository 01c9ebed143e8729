mod cli;
mod compare;
mod config;
mod driver;
mod report;
#[cfg(test)]
mod testutil;

use std::time::Instant;

use clap::Parser;
use config::ResolvedRunConfig;
use report::terminal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let start = Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shotdiff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not errors
            let code = if e.use_stderr() {
                report::EXIT_INVALID
            } else {
                0
            };
            // A closed stdout/stderr leaves nowhere to report to; the exit
            // code still carries the result.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = match ResolvedRunConfig::new(cli.into_overrides()) {
        Ok(config) => config,
        Err(e) => {
            terminal::print_error(&e);
            std::process::exit(report::EXIT_INVALID);
        }
    };
    debug!(
        base = %config.base.display(),
        reference = %config.reference.display(),
        colors = %config.colors,
        timeout = ?config.timeout,
        "configuration resolved"
    );

    let outcome = driver::run(config).await;
    terminal::print_outcome(&outcome, start.elapsed());

    // Exiting here also abandons a scan that lost the race.
    std::process::exit(report::exit_code(&outcome));
}
