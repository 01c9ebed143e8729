use std::ops::Range;

use super::DiffError;
use super::color::{MAX_CHANNEL, unpremultiply};
use super::distance::PixelDistance;
use super::raster::Image;

/// Alpha-weighted distance accumulated over a set of rows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowSum {
    pub sum: f64,
    pub pixels: u64,
}

impl RowSum {
    pub fn merge(self, other: RowSum) -> RowSum {
        RowSum {
            sum: self.sum + other.sum,
            pixels: self.pixels + other.pixels,
        }
    }
}

/// Scan `rows` of two equally sized images.
///
/// Each pixel distance is weighted by the reference alpha only; the base
/// image's alpha is ignored. Callers check dimensions first.
pub fn scan_rows(
    base: &Image,
    reference: &Image,
    rows: Range<u32>,
    metric: &PixelDistance,
) -> Result<RowSum, DiffError> {
    debug_assert_eq!(base.dimensions(), reference.dimensions());
    debug_assert!(rows.end <= base.height());

    let width = base.width();
    let mut sum = 0.0;
    for y in rows.clone() {
        for x in 0..width {
            let (r1, g1, b1, a1) = base.rgba(x, y);
            let (r2, g2, b2, a2) = reference.rgba(x, y);
            let base_px = unpremultiply(r1, g1, b1, a1);
            let ref_px = unpremultiply(r2, g2, b2, a2);

            let d = metric.between(&base_px, &ref_px);
            sum += d * alpha_fraction(ref_px.a, x, y)?;
        }
    }

    Ok(RowSum {
        sum,
        pixels: u64::from(rows.end - rows.start) * u64::from(width),
    })
}

/// Reference alpha as a fraction of the maximum.
///
/// Anything outside `[0, 1]` means the channel data is corrupt.
#[inline]
fn alpha_fraction(alpha: f64, x: u32, y: u32) -> Result<f64, DiffError> {
    let fraction = alpha / MAX_CHANNEL;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(DiffError::AlphaOutOfRange { x, y, alpha: fraction });
    }
    Ok(fraction)
}
