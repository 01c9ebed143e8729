//! On-disk image fixtures for tests.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

/// A scratch directory that test images are written into.
///
/// Each test owns its own `Fixtures`; the directory is removed on drop.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `img` as `name`; the extension picks the encoder.
    pub fn write(&self, name: &str, img: &RgbaImage) -> PathBuf {
        let path = self.path(name);
        save(&path, img);
        path
    }

    pub fn solid(&self, name: &str, w: u32, h: u32, color: Rgba<u8>) -> PathBuf {
        self.write(name, &RgbaImage::from_pixel(w, h, color))
    }

    pub fn pattern(&self, name: &str, w: u32, h: u32, seed: i64) -> PathBuf {
        self.write(name, &pattern(w, h, seed))
    }
}

fn save(path: &Path, img: &RgbaImage) {
    let format = ImageFormat::from_path(path).unwrap();
    let img = DynamicImage::ImageRgba8(img.clone());
    // JPEG has no alpha channel.
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    img.save_with_format(path, format).unwrap();
}

/// Deterministic, screenshot-sized noise: colors derived from the distances
/// to five seed-dependent points, biased toward white.
pub fn pattern(w: u32, h: u32, seed: i64) -> RgbaImage {
    let points = five_points(w.max(1), h.max(1), seed);
    let more_white = |v: i64| ((220 * v) / 256 + 36) as u8;
    let dist = |x: u32, y: u32, p: (i64, i64)| {
        let dx = f64::from(x) - p.0 as f64;
        let dy = f64::from(y) - p.1 as f64;
        (dx * dx + dy * dy).sqrt()
    };

    RgbaImage::from_fn(w, h, |x, y| {
        let d1 = dist(x, y, points[0]) + 2.0 * dist(x, y, points[1]);
        let d2 = dist(x, y, points[2]) + d1 - 5.0 * dist(x, y, points[3]);
        let d3 = dist(x, y, points[4]);
        Rgba([
            more_white((d1 as i64).rem_euclid(256)),
            more_white((d2 as i64).rem_euclid(256)),
            more_white((d3 as i64).rem_euclid(256)),
            255,
        ])
    })
}

fn five_points(w: u32, h: u32, seed: i64) -> [(i64, i64); 5] {
    let (w, h) = (i64::from(w), i64::from(h));
    [7, 11, 13, 17, 19].map(|d: i64| {
        let x = (seed / d + seed % (135 * d)).rem_euclid(w);
        let y = (3 * seed / d + seed % (287 * d)).rem_euclid(h);
        (x, y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_deterministic() {
        assert_eq!(pattern(32, 20, 99), pattern(32, 20, 99));
        assert_ne!(pattern(32, 20, 99), pattern(32, 20, 100));
    }

    #[test]
    fn fixtures_round_trip_through_disk() {
        let fx = Fixtures::new();
        let path = fx.pattern("p.png", 16, 8, 3);
        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back, pattern(16, 8, 3));
    }
}
