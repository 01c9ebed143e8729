use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::ValueEnum;

use super::{ColorSpace, FileConfig, ScoreConfig, load, parse_duration, validate_score};

/// Values extracted from the CLI that participate in the merge.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base: PathBuf,
    pub reference: PathBuf,
    pub config: Option<PathBuf>,
    pub colors: Option<ColorSpace>,
    pub timeout: Option<Duration>,
    pub wait: Option<Duration>,
    pub parallel: Option<usize>,
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug, Clone)]
pub struct ResolvedRunConfig {
    pub base: PathBuf,
    pub reference: PathBuf,
    pub colors: ColorSpace,
    /// Zero means no deadline.
    pub timeout: Duration,
    pub wait: Duration,
    /// Number of row workers used by the scan.
    pub parallel: usize,
    pub score: ScoreConfig,
}

impl ResolvedRunConfig {
    pub fn new(cli: CliOverrides) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Merge with an explicit environment lookup.
    pub fn resolve(cli: CliOverrides, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // 1. File layer (only when a path is given)
        let config_path = cli
            .config
            .clone()
            .or_else(|| env("SHOTDIFF_CONFIG").map(PathBuf::from));
        let file_config = match &config_path {
            Some(path) => load(path)?,
            None => FileConfig::default(),
        };
        let file = file_config.compare;

        // 2. Env layer
        let env_colors = env("SHOTDIFF_COLORS")
            .map(|v| {
                ColorSpace::from_str(&v, true).map_err(|_| anyhow!("unknown color space '{v}'"))
            })
            .transpose()
            .context("SHOTDIFF_COLORS must be one of RGB, Y'UV")?;
        let env_timeout = env_duration(&env, "SHOTDIFF_TIMEOUT")?;
        let env_wait = env_duration(&env, "SHOTDIFF_WAIT")?;
        let env_parallel: Option<usize> = env("SHOTDIFF_PARALLEL")
            .map(|v| v.trim().parse::<usize>())
            .transpose()
            .context("SHOTDIFF_PARALLEL must be a positive integer")?;

        let file_timeout = file
            .timeout
            .as_deref()
            .map(parse_duration)
            .transpose()
            .context("compare.timeout")?;
        let file_wait = file
            .wait
            .as_deref()
            .map(parse_duration)
            .transpose()
            .context("compare.wait")?;

        // 3. CLI > env > file > default
        let colors = cli.colors.or(env_colors).or(file.colors).unwrap_or_default();
        let timeout = cli.timeout.or(env_timeout).or(file_timeout).unwrap_or_default();
        let wait = cli.wait.or(env_wait).or(file_wait).unwrap_or_default();
        let parallel = cli
            .parallel
            .or(env_parallel)
            .or(file.parallel)
            .unwrap_or_else(default_parallel);
        if parallel == 0 {
            bail!("parallel must be at least 1");
        }

        let score = file_config.score;
        validate_score(&score)?;

        Ok(Self {
            base: cli.base,
            reference: cli.reference,
            colors,
            timeout,
            wait,
            parallel,
            score,
        })
    }
}

fn env_duration(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    env(key)
        .map(|v| parse_duration(&v))
        .transpose()
        .with_context(|| format!("{key} must be a duration literal"))
}

fn default_parallel() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}
