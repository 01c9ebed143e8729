//! Conversions between the decoded pixel representation and the color
//! models used for comparison.

use image::Rgba;

use crate::config::ColorSpace;

/// Largest 16-bit channel value.
pub const MAX_CHANNEL: f64 = 65535.0;

// BT.601 luma weights
const WR: f64 = 0.299;
const WG: f64 = 0.587;
const WB: f64 = 0.114;

const U_SCALE: f64 = 0.492;
const V_SCALE: f64 = 0.877;

/// Straight (non-premultiplied) color with channels in `[0, 65535]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Straight {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Scale straight 16-bit channels by alpha, `c * a / 0xFFFF`.
pub fn premultiply(px: &Rgba<u16>) -> Rgba<u16> {
    let Rgba([r, g, b, a]) = *px;
    let a32 = u32::from(a);
    let scale = |c: u16| (u32::from(c) * a32 / 0xFFFF) as u16;
    Rgba([scale(r), scale(g), scale(b), a])
}

/// Undo alpha premultiplication.
///
/// A fully transparent pixel yields all zeros instead of dividing by zero.
#[inline]
pub fn unpremultiply(r: u32, g: u32, b: u32, a: u32) -> Straight {
    if a == 0 {
        return Straight::default();
    }
    let d = f64::from(a);
    Straight {
        r: f64::from(r) * MAX_CHANNEL / d,
        g: f64::from(g) * MAX_CHANNEL / d,
        b: f64::from(b) * MAX_CHANNEL / d,
        a: d,
    }
}

/// Straight RGB to Y'UV (SDTV, BT.601).
#[inline]
pub fn to_yuv(c: &Straight) -> [f64; 3] {
    let y = WR * c.r + WG * c.g + WB * c.b;
    [y, U_SCALE * (c.b - y), V_SCALE * (c.r - y)]
}

impl ColorSpace {
    /// The three components compared in this color space.
    #[inline]
    pub fn components(self, c: &Straight) -> [f64; 3] {
        match self {
            Self::Rgb => [c.r, c.g, c.b],
            Self::Yuv => to_yuv(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn transparent_pixel_is_black_not_nan() {
        let c = unpremultiply(0, 0, 0, 0);
        assert_eq!(c, Straight::default());
        // Garbage color under zero alpha must not leak through either.
        let c = unpremultiply(1234, 5678, 9, 0);
        assert_eq!(c, Straight::default());
    }

    #[test]
    fn opaque_pixel_is_unchanged() {
        let c = unpremultiply(65535, 32768, 0, 65535);
        assert!(approx(c.r, 65535.0));
        assert!(approx(c.g, 32768.0));
        assert!(approx(c.b, 0.0));
        assert!(approx(c.a, 65535.0));
    }

    #[test]
    fn half_alpha_is_scaled_back_up() {
        let px = premultiply(&Rgba([65535, 40000, 0, 32768]));
        let Rgba([r, g, b, a]) = px;
        assert_eq!(a, 32768);
        let c = unpremultiply(r.into(), g.into(), b.into(), a.into());
        assert!((c.r - 65535.0).abs() < 2.0);
        assert!((c.g - 40000.0).abs() < 2.0);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn premultiply_opaque_and_transparent() {
        assert_eq!(
            premultiply(&Rgba([100, 200, 300, 65535])),
            Rgba([100, 200, 300, 65535])
        );
        assert_eq!(premultiply(&Rgba([100, 200, 300, 0])), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn yuv_of_white_is_pure_luma() {
        let white = Straight {
            r: MAX_CHANNEL,
            g: MAX_CHANNEL,
            b: MAX_CHANNEL,
            a: MAX_CHANNEL,
        };
        let [y, u, v] = to_yuv(&white);
        assert!(approx(y, MAX_CHANNEL));
        assert!(approx(u, 0.0));
        assert!(approx(v, 0.0));
    }

    #[test]
    fn yuv_of_red() {
        let red = Straight {
            r: MAX_CHANNEL,
            ..Straight::default()
        };
        let [y, u, v] = to_yuv(&red);
        assert!(approx(y, 0.299 * MAX_CHANNEL));
        assert!(approx(u, 0.492 * -y));
        assert!(approx(v, 0.877 * (MAX_CHANNEL - y)));
    }

    #[test]
    fn rgb_components_are_passthrough() {
        let c = Straight {
            r: 1.0,
            g: 2.0,
            b: 3.0,
            a: 4.0,
        };
        assert_eq!(ColorSpace::Rgb.components(&c), [1.0, 2.0, 3.0]);
    }
}
