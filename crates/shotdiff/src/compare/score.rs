use super::scan::RowSum;
use crate::config::ScoreConfig;

/// Difference measure of two images.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difference {
    /// 0.0 = identical, 1.0 = completely different.
    pub score: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub rounding_error_factor: f64,
}

impl Difference {
    /// Turn an accumulated scan into the final, clamped score.
    ///
    /// An image without pixels scores 0.0.
    pub fn aggregate(total: RowSum, config: &ScoreConfig) -> Self {
        let mut diff = Self {
            score: 0.0,
            min_value: 0.0,
            max_value: 1.0,
            rounding_error_factor: config.rounding_error_factor,
        };
        if total.pixels > 0 {
            let mean = total.sum / total.pixels as f64;
            diff.score = (mean * diff.rounding_error_factor).clamp(diff.min_value, diff.max_value);
        }
        diff
    }

    /// Score as a percentage of the normalized range.
    pub fn percent(&self) -> f64 {
        100.0 * (self.score - self.min_value) / (self.max_value - self.min_value)
    }

    /// Integer floor of [`Self::percent`], in `0..=100`.
    pub fn percent_floor(&self) -> u8 {
        self.percent().floor().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(sum: f64, pixels: u64) -> RowSum {
        RowSum { sum, pixels }
    }

    #[test]
    fn mean_is_corrected_by_factor() {
        let d = Difference::aggregate(sum(40.0, 100), &ScoreConfig::default());
        assert!((d.score - 0.5).abs() < 1e-12);
        assert_eq!(d.rounding_error_factor, 1.25);
        assert_eq!((d.min_value, d.max_value), (0.0, 1.0));
    }

    #[test]
    fn score_is_clamped_to_one() {
        let d = Difference::aggregate(sum(100.0, 100), &ScoreConfig::default());
        assert_eq!(d.score, 1.0);
        assert_eq!(d.percent_floor(), 100);
    }

    #[test]
    fn negative_sum_clamps_to_zero() {
        let d = Difference::aggregate(sum(-1.0, 10), &ScoreConfig::default());
        assert_eq!(d.score, 0.0);
    }

    #[test]
    fn empty_image_scores_zero() {
        let d = Difference::aggregate(RowSum::default(), &ScoreConfig::default());
        assert_eq!(d.score, 0.0);
        assert!(!d.score.is_nan());
    }

    #[test]
    fn custom_factor_is_used() {
        let config = ScoreConfig {
            rounding_error_factor: 1.0,
            ..ScoreConfig::default()
        };
        let d = Difference::aggregate(sum(30.0, 100), &config);
        assert!((d.score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn percentage_floors() {
        let mut d = Difference::aggregate(RowSum::default(), &ScoreConfig::default());
        for (score, expected) in [
            (0.0, 0),
            (0.0099, 0),
            (0.01, 1),
            (0.4299, 42),
            (0.999, 99),
            (1.0, 100),
        ] {
            d.score = score;
            assert_eq!(d.percent_floor(), expected, "score {score}");
        }
        d.score = 0.12345;
        assert_eq!(format!("{:.3}", d.percent()), "12.345");
    }
}
