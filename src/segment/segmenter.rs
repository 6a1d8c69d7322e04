use super::params::SegmenterParams;
use crate::image::{ImageRgb8, ImageViewMut, Mask};
use crate::imgproc::{
    abs_diff, box_mean, centered_ellipse, largest_external_contour, lightness_plane, morphology,
    rgb_to_hsv,
};
use log::{debug, trace};
use serde::Serialize;

/// Which path produced the returned mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MaskSource {
    /// Filled interior of the main colour/texture contour.
    Heuristic,
    /// Heuristic mask restricted to the central search ellipse because the
    /// main contour looked like background.
    CentralRegion,
    /// Centered geometric ellipse.
    Fallback,
}

#[derive(Clone, Debug, Default)]
pub struct ForegroundSegmenter {
    params: SegmenterParams,
}

impl ForegroundSegmenter {
    pub fn new(params: SegmenterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SegmenterParams {
        &self.params
    }

    /// Food mask for `image`. Never fails: anything that does not pass the
    /// validity predicate is replaced by the centered fallback ellipse.
    pub fn segment(&self, image: &ImageRgb8<'_>) -> Mask {
        self.segment_with_source(image).0
    }

    pub fn segment_with_source(&self, image: &ImageRgb8<'_>) -> (Mask, MaskSource) {
        if let Err(reason) = image.check_layout() {
            debug!("ForegroundSegmenter: {reason}, using fallback ellipse");
            return (self.fallback_mask(image.w, image.h), MaskSource::Fallback);
        }
        let (mask, source) = self.heuristic_mask(image);
        if source != MaskSource::Fallback && self.is_valid(&mask) {
            return (mask, source);
        }
        if source != MaskSource::Fallback {
            debug!(
                "ForegroundSegmenter: {:?} mask failed validation (coverage={:.3}), using fallback ellipse",
                source,
                mask.coverage()
            );
        }
        (self.fallback_mask(image.w, image.h), MaskSource::Fallback)
    }

    /// Validity predicate with this segmenter's thresholds.
    pub fn is_valid(&self, mask: &Mask) -> bool {
        self.params.validity.check(mask)
    }

    /// Centered ellipse with the configured fallback axes.
    pub fn fallback_mask(&self, w: usize, h: usize) -> Mask {
        let f = self.params.fallback_axes;
        centered_ellipse(w, h, f, f)
    }

    /// Union of the configured colour boxes.
    pub fn color_mask(&self, image: &ImageRgb8<'_>) -> Mask {
        let mut mask = Mask::new(image.w, image.h);
        let ranges = &self.params.color_ranges;
        for y in 0..image.h {
            let src = image.row(y);
            let dst = mask.row_mut(y);
            for (d, px) in dst.iter_mut().zip(src.chunks_exact(3)) {
                let hsv = rgb_to_hsv([px[0], px[1], px[2]]);
                *d = u8::from(ranges.iter().any(|r| r.contains(hsv)));
            }
        }
        mask
    }

    /// Mid-tone pixels that also carry local lightness detail.
    pub fn texture_mask(&self, image: &ImageRgb8<'_>) -> Mask {
        let p = &self.params;
        let lightness = lightness_plane(image);
        let detail = abs_diff(&lightness, &box_mean(&lightness, p.texture_window));
        let data = lightness
            .data
            .iter()
            .zip(&detail.data)
            .map(|(&l, &d)| {
                let exposed = l > p.lightness_min && l <= p.lightness_max;
                u8::from(exposed && d >= p.texture_min_detail)
            })
            .collect();
        Mask {
            w: image.w,
            h: image.h,
            data,
        }
    }

    /// Colour ∪ texture, closed then opened.
    pub fn candidate_mask(&self, image: &ImageRgb8<'_>) -> Mask {
        let mut mask = self.color_mask(image);
        mask.union_with(&self.texture_mask(image));
        let k = self.params.morph_kernel;
        morphology::open(&morphology::close(&mask, k), k)
    }

    fn heuristic_mask(&self, image: &ImageRgb8<'_>) -> (Mask, MaskSource) {
        let p = &self.params;
        let (w, h) = (image.w, image.h);
        let total = (w * h) as f32;
        let mut mask = self.candidate_mask(image);
        trace!(
            "ForegroundSegmenter: candidate coverage={:.3}",
            mask.coverage()
        );

        let mut source = MaskSource::Heuristic;
        if let Some(main) = largest_external_contour(&mask) {
            if main.area() as f32 > total * p.background_area_ratio {
                debug!(
                    "ForegroundSegmenter: main contour covers {:.3} of the image, restricting to centre",
                    main.area() as f32 / total
                );
                let axes = p.search_region_axes;
                mask.intersect_with(&centered_ellipse(w, h, axes, axes));
                source = MaskSource::CentralRegion;
            } else {
                mask = main.to_mask(w, h);
            }
        }

        if mask.coverage() > p.max_final_coverage {
            debug!(
                "ForegroundSegmenter: final coverage {:.3} too large, using fallback ellipse",
                mask.coverage()
            );
            return (self.fallback_mask(w, h), MaskSource::Fallback);
        }
        (mask, source)
    }
}
