pub mod duration;
pub mod resolve;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub use self::duration::parse_duration;
pub use self::resolve::{CliOverrides, ResolvedRunConfig};

/// Euclidean distance between pure black and pure white in 16-bit RGB, rounded.
pub const DEFAULT_NORMALIZATION: f64 = 113510.0;

/// Compensates for the systematic underestimate of the mean distance.
pub const DEFAULT_ROUNDING_ERROR_FACTOR: f64 = 1.25;

/// Color model in which two pixels are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
pub enum ColorSpace {
    #[default]
    #[value(name = "RGB")]
    #[serde(rename = "RGB")]
    Rgb,
    /// Luma/chroma; closer to how the eye perceives differences.
    #[value(name = "Y'UV", alias = "YUV")]
    #[serde(rename = "Y'UV", alias = "YUV")]
    Yuv,
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => f.write_str("RGB"),
            Self::Yuv => f.write_str("Y'UV"),
        }
    }
}

/// Constants that fix the scale of the difference score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreConfig {
    #[serde(default = "default_normalization")]
    pub normalization: f64,
    #[serde(default = "default_rounding_error_factor")]
    pub rounding_error_factor: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            normalization: DEFAULT_NORMALIZATION,
            rounding_error_factor: DEFAULT_ROUNDING_ERROR_FACTOR,
        }
    }
}

fn default_normalization() -> f64 {
    DEFAULT_NORMALIZATION
}

fn default_rounding_error_factor() -> f64 {
    DEFAULT_ROUNDING_ERROR_FACTOR
}

/// `[compare]` table. Durations are kept as literals and parsed on resolve.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub compare: CompareSection,
    #[serde(default)]
    pub score: ScoreConfig,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        let config: FileConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate semantic constraints that serde cannot express.
    fn validate(&self) -> Result<()> {
        validate_score(&self.score)?;
        if self.compare.parallel == Some(0) {
            bail!("compare.parallel must be at least 1");
        }
        Ok(())
    }
}

pub fn validate_score(score: &ScoreConfig) -> Result<()> {
    if !(score.normalization.is_finite() && score.normalization > 0.0) {
        bail!(
            "score.normalization must be a positive number, got {}",
            score.normalization
        );
    }
    if !(score.rounding_error_factor.is_finite() && score.rounding_error_factor > 0.0) {
        bail!(
            "score.rounding_error_factor must be a positive number, got {}",
            score.rounding_error_factor
        );
    }
    Ok(())
}

pub fn load(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    FileConfig::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
