use super::color::Straight;
use crate::config::{ColorSpace, DEFAULT_NORMALIZATION};

/// Normalized Euclidean distance between two pixels in a chosen color space.
///
/// The same normalization divides both color spaces, so Y'UV distances are
/// smaller in absolute terms than RGB distances for the same pair of pixels.
/// The result is not clamped; aggregation does that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelDistance {
    pub space: ColorSpace,
    pub normalization: f64,
}

impl PixelDistance {
    pub fn new(space: ColorSpace, normalization: f64) -> Self {
        Self {
            space,
            normalization,
        }
    }

    #[inline]
    pub fn between(&self, base: &Straight, reference: &Straight) -> f64 {
        let a = self.space.components(base);
        let b = self.space.components(reference);
        euclidean(&a, &b) / self.normalization
    }
}

impl Default for PixelDistance {
    fn default() -> Self {
        Self::new(ColorSpace::default(), DEFAULT_NORMALIZATION)
    }
}

#[inline]
fn euclidean(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
