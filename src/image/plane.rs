//! Owned 8-bit planes produced by the pipeline: the binary food [`Mask`] and
//! the relative [`DepthMap`].
use crate::image::traits::{ImageView, ImageViewMut};

/// Binary H×W mask, `1` marks a food pixel and `0` background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.w + x] = u8::from(on);
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Fraction of the image covered by the mask, `0.0` for an empty image.
    pub fn coverage(&self) -> f32 {
        let total = self.w * self.h;
        if total == 0 {
            0.0
        } else {
            self.count() as f32 / total as f32
        }
    }

    pub fn union_with(&mut self, other: &Mask) {
        debug_assert_eq!((self.w, self.h), (other.w, other.h));
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a |= b;
        }
    }

    pub fn intersect_with(&mut self, other: &Mask) {
        debug_assert_eq!((self.w, self.h), (other.w, other.h));
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a &= b;
        }
    }
}

impl ImageView for Mask {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for Mask {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}

/// Relative depth in `[0, 255]`; lower values mark more textured ("nearer")
/// regions. This is a detail proxy, not a physical distance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl DepthMap {
    pub fn uniform(w: usize, h: usize, value: u8) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    /// Mean depth over the pixels where `mask` is set, `None` if the mask is
    /// empty or the dimensions disagree.
    pub fn mean_under(&self, mask: &Mask) -> Option<f32> {
        if (self.w, self.h) != (mask.w, mask.h) {
            return None;
        }
        let (sum, n) = self
            .data
            .iter()
            .zip(&mask.data)
            .filter(|(_, m)| **m != 0)
            .fold((0u64, 0usize), |(s, n), (&d, _)| (s + d as u64, n + 1));
        (n > 0).then(|| sum as f32 / n as f32)
    }
}

impl ImageView for DepthMap {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
