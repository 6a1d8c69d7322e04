//! Separable smoothing filters on [`ImageF32`] planes.
//!
//! Borders use reflect-101 indexing (`dcb|abcd|cba`). Rows are processed in
//! parallel; each output sample depends only on the input, so results match a
//! sequential run exactly.
use crate::image::ImageF32;
use rayon::prelude::*;

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order, odd length).
    fn taps(&self) -> &[f32];
}

/// Owned, normalised 1D kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel1d {
    taps: Vec<f32>,
}

impl Kernel1d {
    /// Sampled Gaussian of odd size `size`. A non-positive `sigma` derives
    /// the spread from the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`.
    pub fn gaussian(size: usize, sigma: f32) -> Self {
        let size = size.max(1) | 1;
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let radius = (size / 2) as f32;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f32> = (0..size)
            .map(|i| {
                let d = i as f32 - radius;
                (-(d * d) / denom).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }

    /// Uniform averaging kernel of odd size `size`.
    pub fn box_mean(size: usize) -> Self {
        let size = size.max(1) | 1;
        Self {
            taps: vec![1.0 / size as f32; size],
        }
    }
}

impl SeparableFilter for Kernel1d {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Convolve `src` with `filter` horizontally, then vertically.
pub fn apply_separable(filter: &dyn SeparableFilter, src: &ImageF32) -> ImageF32 {
    let taps = filter.taps();
    let (w, h) = (src.w, src.h);
    if w == 0 || h == 0 || taps.is_empty() {
        return src.clone();
    }
    let radius = (taps.len() / 2) as isize;

    let mut tmp = ImageF32::new(w, h);
    tmp.data
        .par_chunks_mut(w)
        .zip(src.data.par_chunks(src.stride))
        .for_each(|(dst, row)| {
            for (x, d) in dst.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (k, &tap) in taps.iter().enumerate() {
                    let sx = reflect101(x as isize + k as isize - radius, w);
                    acc += tap * row[sx];
                }
                *d = acc;
            }
        });

    let mut out = ImageF32::new(w, h);
    out.data.par_chunks_mut(w).enumerate().for_each(|(y, dst)| {
        for (x, d) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = reflect101(y as isize + k as isize - radius, h);
                acc += tap * tmp.data[sy * w + x];
            }
            *d = acc;
        }
    });
    out
}

/// Gaussian blur with an odd square `size` and derived sigma.
pub fn gaussian_blur(src: &ImageF32, size: usize) -> ImageF32 {
    apply_separable(&Kernel1d::gaussian(size, 0.0), src)
}

/// Local mean over a `size × size` window.
pub fn box_mean(src: &ImageF32, size: usize) -> ImageF32 {
    apply_separable(&Kernel1d::box_mean(size), src)
}

/// Per-pixel `|a - b|`. Both planes must share dimensions.
pub fn abs_diff(a: &ImageF32, b: &ImageF32) -> ImageF32 {
    debug_assert_eq!((a.w, a.h), (b.w, b.h));
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&x, &y)| (x - y).abs())
        .collect();
    ImageF32 {
        w: a.w,
        h: a.h,
        stride: a.w,
        data,
    }
}

/// Reflect-101 index into `[0, upper)`.
pub(crate) fn reflect101(idx: isize, upper: usize) -> usize {
    if upper <= 1 {
        return 0;
    }
    let n = upper as isize;
    let period = 2 * (n - 1);
    let mut i = idx.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}
