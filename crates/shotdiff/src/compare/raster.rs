use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageBuffer, ImageFormat, ImageReader, Rgba};
use tracing::debug;

use super::color::premultiply;

/// Decoded, read-only image with 16-bit premultiplied RGBA pixels.
pub struct Image {
    pixels: ImageBuffer<Rgba<u16>, Vec<u16>>,
    format: Option<ImageFormat>,
}

impl Image {
    /// Decode an image file. The format is sniffed from the content.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("failed to open image: {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("failed to read image: {}", path.display()))?;
        let format = reader.format();
        let decoded = reader
            .decode()
            .with_context(|| format!("failed to decode image: {}", path.display()))?;

        let image = Self::from_dynamic(decoded, format);
        debug!(
            path = %path.display(),
            format = ?image.format(),
            width = image.width(),
            height = image.height(),
            "image decoded"
        );
        Ok(image)
    }

    pub fn from_dynamic(decoded: DynamicImage, format: Option<ImageFormat>) -> Self {
        let mut pixels = decoded.into_rgba16();
        for px in pixels.pixels_mut() {
            *px = premultiply(px);
        }
        Self { pixels, format }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Source format tag, when the decoder could tell.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Premultiplied `(r, g, b, a)` at `(x, y)`.
    #[inline]
    pub fn rgba(&self, x: u32, y: u32) -> (u32, u32, u32, u32) {
        let Rgba([r, g, b, a]) = *self.pixels.get_pixel(x, y);
        (r.into(), g.into(), b.into(), a.into())
    }
}

impl From<DynamicImage> for Image {
    fn from(decoded: DynamicImage) -> Self {
        Self::from_dynamic(decoded, None)
    }
}
