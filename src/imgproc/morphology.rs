//! Binary morphology with a square structuring element.
//!
//! Window samples that fall outside the image are skipped, so borders never
//! grow or shrink the mask on their own.
use crate::image::Mask;
use rayon::prelude::*;

#[derive(Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

impl Op {
    #[inline]
    fn fold(self, window: &[u8]) -> u8 {
        match self {
            Op::Erode => window.iter().copied().min().unwrap_or(0),
            Op::Dilate => window.iter().copied().max().unwrap_or(0),
        }
    }
}

fn apply(mask: &Mask, size: usize, op: Op) -> Mask {
    let (w, h) = (mask.w, mask.h);
    if w == 0 || h == 0 || size <= 1 {
        return mask.clone();
    }
    let radius = size / 2;

    let mut tmp = Mask::new(w, h);
    tmp.data
        .par_chunks_mut(w)
        .zip(mask.data.par_chunks(w))
        .for_each(|(dst, row)| {
            for (x, d) in dst.iter_mut().enumerate() {
                let lo = x.saturating_sub(radius);
                let hi = (x + radius).min(w - 1);
                *d = op.fold(&row[lo..=hi]);
            }
        });

    let mut out = Mask::new(w, h);
    out.data.par_chunks_mut(w).enumerate().for_each(|(y, dst)| {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(h - 1);
        let mut column = Vec::with_capacity(hi - lo + 1);
        for (x, d) in dst.iter_mut().enumerate() {
            column.clear();
            column.extend((lo..=hi).map(|sy| tmp.data[sy * w + x]));
            *d = op.fold(&column);
        }
    });
    out
}

pub fn erode(mask: &Mask, size: usize) -> Mask {
    apply(mask, size, Op::Erode)
}

pub fn dilate(mask: &Mask, size: usize) -> Mask {
    apply(mask, size, Op::Dilate)
}

/// Dilate then erode: fills holes and gaps narrower than the element.
pub fn close(mask: &Mask, size: usize) -> Mask {
    erode(&dilate(mask, size), size)
}

/// Erode then dilate: removes specks smaller than the element.
pub fn open(mask: &Mask, size: usize) -> Mask {
    dilate(&erode(mask, size), size)
}
