//! Per-pixel colour conversions for 8-bit RGB input.
//!
//! Hue follows the 8-bit convention used by common vision toolkits: degrees
//! halved into `[0, 180]`. Lightness is CIE L* rescaled from `[0, 100]` to
//! `[0, 255]`.
use crate::image::{ImageF32, ImageRgb8, ImageViewMut};

/// Hue/saturation/value triple in the 8-bit convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// Inclusive HSV box used to pick colour candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, px: Hsv) -> bool {
        (self.lower[0]..=self.upper[0]).contains(&px.h)
            && (self.lower[1]..=self.upper[1]).contains(&px.s)
            && (self.lower[2]..=self.upper[2]).contains(&px.v)
    }
}

pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = v - min;
    let s = if v > 0.0 { delta * 255.0 / v } else { 0.0 };
    let mut h = if delta <= 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / delta
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }
    Hsv {
        h: (h / 2.0).round().min(180.0) as u8,
        s: s.round().min(255.0) as u8,
        v: v as u8,
    }
}

#[inline]
fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// CIE L* of an sRGB pixel, scaled to `[0, 255]`.
pub fn rgb_to_lightness([r, g, b]: [u8; 3]) -> f32 {
    let y = 0.212_671 * srgb_to_linear(r)
        + 0.715_160 * srgb_to_linear(g)
        + 0.072_169 * srgb_to_linear(b);
    let l = if y > 0.008_856 {
        116.0 * y.cbrt() - 16.0
    } else {
        903.3 * y
    };
    (l * 255.0 / 100.0).clamp(0.0, 255.0)
}

#[inline]
pub fn rgb_to_luma([r, g, b]: [u8; 3]) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Luma plane in `[0, 255]`.
pub fn luma_plane(image: &ImageRgb8<'_>) -> ImageF32 {
    map_plane(image, rgb_to_luma)
}

/// L* plane in `[0, 255]`.
pub fn lightness_plane(image: &ImageRgb8<'_>) -> ImageF32 {
    map_plane(image, rgb_to_lightness)
}

fn map_plane(image: &ImageRgb8<'_>, f: impl Fn([u8; 3]) -> f32) -> ImageF32 {
    let mut out = ImageF32::new(image.w, image.h);
    for y in 0..image.h {
        let src = image.row(y);
        let dst = out.row_mut(y);
        for (d, px) in dst.iter_mut().zip(src.chunks_exact(3)) {
            *d = f([px[0], px[1], px[2]]);
        }
    }
    out
}
