use crate::imgproc::HsvRange;
use serde::{Deserialize, Serialize};

/// Hue/saturation/value boxes associated with common food colours.
///
/// Hue is in the 8-bit `[0, 180]` convention; red needs two boxes because it
/// straddles the wraparound.
pub const FOOD_COLOR_RANGES: [HsvRange; 5] = [
    HsvRange::new([10, 40, 40], [25, 255, 255]),  // orange / brown
    HsvRange::new([0, 40, 40], [10, 255, 255]),   // red
    HsvRange::new([170, 40, 40], [180, 255, 255]), // red, past the wrap
    HsvRange::new([35, 40, 40], [85, 255, 255]),  // green
    HsvRange::new([20, 40, 40], [35, 255, 255]),  // yellow
];

/// Knobs for [`ForegroundSegmenter`](super::ForegroundSegmenter).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    /// Colour candidate boxes, unioned.
    pub color_ranges: Vec<HsvRange>,
    /// Pixels with lightness at or below this value are too dark (exclusive).
    pub lightness_min: f32,
    /// Pixels with lightness above this value are blown out (inclusive max).
    pub lightness_max: f32,
    /// Window of the local lightness mean used for the detail test.
    pub texture_window: usize,
    /// Minimum `|L - mean(L)|` for a mid-tone pixel to count as textured.
    /// `0.0` keeps every mid-tone pixel.
    pub texture_min_detail: f32,
    /// Side of the square structuring element for closing/opening.
    pub morph_kernel: usize,
    /// Main-contour share of the image above which the background is assumed
    /// to have been selected.
    pub background_area_ratio: f32,
    /// Semi-axes (fraction of width/height) of the central search ellipse.
    pub search_region_axes: f32,
    /// Coverage above which the heuristic mask is discarded outright.
    pub max_final_coverage: f32,
    /// Semi-axes (fraction of width/height) of the fallback ellipse.
    pub fallback_axes: f32,
    pub validity: MaskValidity,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            color_ranges: FOOD_COLOR_RANGES.to_vec(),
            lightness_min: 45.0,
            lightness_max: 220.0,
            texture_window: 5,
            texture_min_detail: 2.0,
            morph_kernel: 7,
            background_area_ratio: 0.75,
            search_region_axes: 0.35,
            max_final_coverage: 0.85,
            fallback_axes: 0.25,
            validity: MaskValidity::default(),
        }
    }
}

/// Thresholds of the mask validity predicate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskValidity {
    pub min_coverage: f32,
    pub max_coverage: f32,
    /// Required share of the mask pixels covered by the largest contour.
    pub min_main_contour_share: f32,
}

impl Default for MaskValidity {
    fn default() -> Self {
        Self {
            min_coverage: 0.03,
            max_coverage: 0.9,
            min_main_contour_share: 0.6,
        }
    }
}
