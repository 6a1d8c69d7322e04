//! Heuristic relative depth from local image detail.
//!
//! The luma image is compared with a heavily blurred copy; the absolute
//! difference measures texture density. After min-max normalisation the
//! signal is inverted so detailed regions get low values ("near") and smooth
//! regions high values ("far"). This is a detail proxy and makes no attempt at
//! geometric distance.

use crate::image::{DepthMap, ImageRgb8};
use crate::imgproc::{abs_diff, gaussian_blur, luma_plane};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthParams {
    /// Odd side of the Gaussian blur kernel.
    pub blur_kernel: usize,
    /// Value of every pixel in the fallback map.
    pub fallback_value: u8,
    /// Detail ranges (luma units) at or below this value count as degenerate;
    /// anything smaller is float noise from the blur.
    pub min_detail_range: f32,
}

impl Default for DepthParams {
    fn default() -> Self {
        Self {
            blur_kernel: 15,
            fallback_value: 128,
            min_detail_range: 1e-3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DepthSource {
    Detail,
    UniformFallback,
}

#[derive(Clone, Debug, Default)]
pub struct PseudoDepthEstimator {
    params: DepthParams,
}

impl PseudoDepthEstimator {
    pub fn new(params: DepthParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DepthParams {
        &self.params
    }

    /// Relative depth map for `image`; never fails.
    pub fn estimate(&self, image: &ImageRgb8<'_>) -> DepthMap {
        self.estimate_with_source(image).0
    }

    pub fn estimate_with_source(&self, image: &ImageRgb8<'_>) -> (DepthMap, DepthSource) {
        match self.detail_depth(image) {
            Ok(map) => (map, DepthSource::Detail),
            Err(reason) => {
                debug!("PseudoDepthEstimator: {reason}, using uniform map");
                (
                    DepthMap::uniform(image.w, image.h, self.params.fallback_value),
                    DepthSource::UniformFallback,
                )
            }
        }
    }

    fn detail_depth(&self, image: &ImageRgb8<'_>) -> Result<DepthMap, String> {
        image.check_layout()?;
        if image.pixel_count() == 0 {
            return Err("empty image".to_string());
        }
        let gray = luma_plane(image);
        let blurred = gaussian_blur(&gray, self.params.blur_kernel);
        let detail = abs_diff(&gray, &blurred);
        let (lo, hi) = detail
            .min_max()
            .ok_or_else(|| "non-finite detail signal".to_string())?;
        let range = hi - lo;
        trace!("PseudoDepthEstimator: detail range [{lo:.3}, {hi:.3}]");
        if range <= self.params.min_detail_range {
            return Err(format!("flat detail signal (range {range:e})"));
        }
        let scale = 255.0 / range;
        let data = detail
            .data
            .iter()
            .map(|&d| (255.0 - (d - lo) * scale).round().clamp(0.0, 255.0) as u8)
            .collect();
        DepthMap::from_raw(image.w, image.h, data)
            .ok_or_else(|| "depth buffer size mismatch".to_string())
    }
}
