pub mod color;
pub mod distance;
pub mod raster;
pub mod scan;
pub mod score;

use std::ops::Range;

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

pub use self::distance::PixelDistance;
pub use self::raster::Image;
pub use self::scan::{RowSum, scan_rows};
pub use self::score::Difference;
use crate::config::ScoreConfig;

/// Rows handed to a worker at a time.
const BAND_ROWS: u32 = 32;

#[derive(Debug, Error)]
pub enum DiffError {
    #[error(
        "image dimensions do not correspond; got {base_w}x{base_h} (base) and {ref_w}x{ref_h} (ref)"
    )]
    DimensionMismatch {
        base_w: u32,
        base_h: u32,
        ref_w: u32,
        ref_h: u32,
    },

    #[error("alpha fraction {alpha} at ({x}, {y}) is outside [0, 1]; pixel data is corrupt")]
    AlphaOutOfRange { x: u32, y: u32, alpha: f64 },

    #[error("failed to start row workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Compare two decoded images and produce the difference score.
///
/// Rows are split into disjoint bands scanned on `parallel` workers. Each
/// band yields its own partial sum; the score is computed only once every
/// band has finished.
pub fn compare(
    base: &Image,
    reference: &Image,
    metric: &PixelDistance,
    score: &ScoreConfig,
    parallel: usize,
) -> Result<Difference, DiffError> {
    if base.dimensions() != reference.dimensions() {
        return Err(DiffError::DimensionMismatch {
            base_w: base.width(),
            base_h: base.height(),
            ref_w: reference.width(),
            ref_h: reference.height(),
        });
    }

    let height = base.height();
    let total = if parallel <= 1 || height <= BAND_ROWS {
        scan_rows(base, reference, 0..height, metric)?
    } else {
        let bands = row_bands(height, BAND_ROWS);
        debug!(workers = parallel, bands = bands.len(), "scanning row bands");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallel)
            .thread_name(|i| format!("shotdiff-scan-{i}"))
            .build()?;
        pool.install(|| {
            bands
                .into_par_iter()
                .map(|rows| scan_rows(base, reference, rows, metric))
                .try_reduce(RowSum::default, |a, b| Ok(a.merge(b)))
        })?
    };

    Ok(Difference::aggregate(total, score))
}

fn row_bands(height: u32, band: u32) -> Vec<Range<u32>> {
    (0..height)
        .step_by(band as usize)
        .map(|start| start..(start + band).min(height))
        .collect()
}
