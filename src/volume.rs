//! Volume integration from a food mask, a relative depth map and food priors.
//!
//! Single images carry no absolute scale, so the pixel-to-centimetre factor
//! comes from assuming that the object's longest bounding-box side spans the
//! typical serving size of its food type. The planar area then follows from
//! the mask pixel count, the height from the mean relative depth over the
//! object, and a per-food shape factor turns `area × height` into a volume.
//! The result is always clamped to the food type's plausible range; `0.0`
//! means no estimate.

use crate::food::{FoodTable, FoodTypeParams};
use crate::image::{DepthMap, Mask};
use crate::imgproc::largest_external_contour;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeParams {
    /// Masks with fewer pixels are rejected.
    pub min_mask_pixels: usize,
    /// Masks covering more than this share of the image are rejected.
    pub max_mask_coverage: f32,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self {
            min_mask_pixels: 500,
            max_mask_coverage: 0.9,
        }
    }
}

/// Why no volume could be computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum VolumeRejection {
    DimensionMismatch,
    TooFewPixels { count: usize, min: usize },
    TooManyPixels { count: usize, max: usize },
    NoContour,
}

/// Intermediate quantities of one volume computation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeBreakdown {
    pub mask_pixels: usize,
    pub object_pixels: usize,
    pub bbox_px: (usize, usize),
    /// Mean object depth divided by 255.
    pub mean_depth: f32,
    pub pixels_per_cm: f32,
    pub planar_area_cm2: f32,
    pub depth_cm: f32,
    pub raw_volume_cm3: f32,
    pub volume_cm3: f32,
}

#[derive(Clone, Debug)]
pub struct VolumetricEstimator {
    params: VolumeParams,
    foods: Arc<FoodTable>,
}

impl Default for VolumetricEstimator {
    fn default() -> Self {
        Self::new(VolumeParams::default(), Arc::new(FoodTable::builtin()))
    }
}

impl VolumetricEstimator {
    pub fn new(params: VolumeParams, foods: Arc<FoodTable>) -> Self {
        Self { params, foods }
    }

    pub fn params(&self) -> &VolumeParams {
        &self.params
    }

    /// Clamped volume in cm³, or `0.0` for degenerate input.
    pub fn compute_volume(&self, mask: &Mask, depth: &DepthMap, food_type: &str) -> f32 {
        match self.compute_volume_detailed(mask, depth, food_type) {
            Ok(breakdown) => breakdown.volume_cm3,
            Err(rejection) => {
                debug!("VolumetricEstimator: rejected ({rejection:?}) for '{food_type}'");
                0.0
            }
        }
    }

    pub fn compute_volume_detailed(
        &self,
        mask: &Mask,
        depth: &DepthMap,
        food_type: &str,
    ) -> Result<VolumeBreakdown, VolumeRejection> {
        if (mask.w, mask.h) != (depth.w, depth.h) {
            return Err(VolumeRejection::DimensionMismatch);
        }
        let total = mask.w * mask.h;
        let count = mask.count();
        if count < self.params.min_mask_pixels {
            return Err(VolumeRejection::TooFewPixels {
                count,
                min: self.params.min_mask_pixels,
            });
        }
        let max = (total as f32 * self.params.max_mask_coverage) as usize;
        if count as f32 > total as f32 * self.params.max_mask_coverage {
            return Err(VolumeRejection::TooManyPixels { count, max });
        }

        let main = largest_external_contour(mask).ok_or(VolumeRejection::NoContour)?;
        let object = main.to_mask(mask.w, mask.h);
        let mean_depth = depth.mean_under(&object).ok_or(VolumeRejection::NoContour)? / 255.0;

        let food = self.foods.get(food_type);
        let bbox_px = (main.bbox_width(), main.bbox_height());
        let breakdown = integrate(food, count, main.area(), bbox_px, mean_depth);
        trace!("VolumetricEstimator: '{food_type}' {breakdown:?}");
        Ok(breakdown)
    }
}

fn integrate(
    food: &FoodTypeParams,
    mask_pixels: usize,
    object_pixels: usize,
    bbox_px: (usize, usize),
    mean_depth: f32,
) -> VolumeBreakdown {
    let pixels_per_cm = bbox_px.0.max(bbox_px.1) as f32 / food.typical_planar_size_cm;
    let planar_area_cm2 = mask_pixels as f32 / (pixels_per_cm * pixels_per_cm);
    let depth_cm = mean_depth * food.max_relief_depth_cm;
    let raw_volume_cm3 = planar_area_cm2 * depth_cm * food.volume_shape_factor;
    VolumeBreakdown {
        mask_pixels,
        object_pixels,
        bbox_px,
        mean_depth,
        pixels_per_cm,
        planar_area_cm2,
        depth_cm,
        raw_volume_cm3,
        volume_cm3: food.clamp_volume(raw_volume_cm3),
    }
}
