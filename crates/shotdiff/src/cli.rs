use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::duration::parse_duration_arg;
use crate::config::{CliOverrides, ColorSpace};

fn parse_parallel(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if n == 0 {
        return Err("must be at least 1".into());
    }
    Ok(n)
}

const AFTER_HELP: &str = "\
DURATIONS
  An unsigned integer followed by a unit: i (milliseconds), s, m or h.
  A bare integer means seconds. Examples: 600i, 2s, 1m, 24h.

RETURN CODE
  0       no differences (every pixel has the same color)
  1-99    difference percentage, rounded down
  100     high difference
  101     invalid arguments, unreadable image, or dimensions do not correspond
  102     timeout reached

Only the reference image's alpha channel is considered: transparent regions
of the reference never count as different. Scoring uses 64-bit floating point
and is subject to rounding errors.";

#[derive(Parser, Debug)]
#[command(
    name = "shotdiff",
    version,
    about = "Compare two images and quantify their difference",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Base image (transparency is ignored)
    pub base: PathBuf,

    /// Reference image (may contain transparency)
    pub reference: PathBuf,

    /// Color space the pixels are compared in [default: RGB]
    #[arg(long, value_enum, ignore_case = true)]
    pub colors: Option<ColorSpace>,

    /// Maximum runtime; 0 means no limit [default: 0s]
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// How long to wait before reading the image files [default: 0s]
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_arg)]
    pub wait: Option<Duration>,

    /// Number of parallel row workers [default: available cores]
    #[arg(long, short = 'p', value_parser = parse_parallel)]
    pub parallel: Option<usize>,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn into_overrides(self) -> CliOverrides {
        CliOverrides {
            base: self.base,
            reference: self.reference,
            config: self.config,
            colors: self.colors,
            timeout: self.timeout,
            wait: self.wait,
            parallel: self.parallel,
        }
    }
}
