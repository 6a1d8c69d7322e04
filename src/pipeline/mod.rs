//! End-to-end estimation: segmentation and pseudo-depth feed the volume
//! integration, whose result is turned into nutrition values and memoized.
//!
//! Only two situations produce "no estimate": an input below the minimum side
//! and a volume stage that finds no usable region. Every other stage degrades
//! to a documented fallback.

mod params;

pub use params::PipelineParams;

use crate::cache::{CacheKey, ImageDigest, ResultCache};
use crate::depth::PseudoDepthEstimator;
use crate::diagnostics::{
    DepthStage, InputDescriptor, PipelineReport, PipelineRun, SegmentationStage, TimingBreakdown,
};
use crate::error::EstimateError;
use crate::food::FoodTable;
use crate::image::ImageRgb8;
use crate::nutrition::{NutritionDeriver, NutritionEstimate};
use crate::segment::ForegroundSegmenter;
use crate::volume::VolumetricEstimator;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

/// One running estimator instance. The result cache lives and dies with it.
#[derive(Debug)]
pub struct NutritionPipeline {
    params: PipelineParams,
    foods: Arc<FoodTable>,
    segmenter: ForegroundSegmenter,
    depth: PseudoDepthEstimator,
    volume: VolumetricEstimator,
    deriver: NutritionDeriver,
    cache: ResultCache,
}

impl Default for NutritionPipeline {
    fn default() -> Self {
        Self::new(PipelineParams::default())
    }
}

impl NutritionPipeline {
    pub fn new(params: PipelineParams) -> Self {
        Self::with_food_table(params, FoodTable::builtin())
    }

    pub fn with_food_table(params: PipelineParams, foods: FoodTable) -> Self {
        let foods = Arc::new(foods);
        Self {
            segmenter: ForegroundSegmenter::new(params.segmenter.clone()),
            depth: PseudoDepthEstimator::new(params.depth),
            volume: VolumetricEstimator::new(params.volume, Arc::clone(&foods)),
            deriver: NutritionDeriver::new(params.nutrition, Arc::clone(&foods)),
            cache: ResultCache::new(params.cache_capacity),
            foods,
            params,
        }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn foods(&self) -> &FoodTable {
        &self.foods
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn segmenter(&self) -> &ForegroundSegmenter {
        &self.segmenter
    }

    pub fn depth_estimator(&self) -> &PseudoDepthEstimator {
        &self.depth
    }

    pub fn volume_estimator(&self) -> &VolumetricEstimator {
        &self.volume
    }

    pub fn deriver(&self) -> &NutritionDeriver {
        &self.deriver
    }

    /// Memoized estimate for `(image, food_type)`.
    pub fn estimate(
        &self,
        image: &ImageRgb8<'_>,
        food_type: &str,
    ) -> Result<NutritionEstimate, EstimateError> {
        self.check_input(image)?;
        self.cache
            .get_or_compute(image, food_type, || self.run_stages(image, food_type))
    }

    /// Same as [`estimate`](Self::estimate) but bypasses the cache entirely.
    pub fn estimate_uncached(
        &self,
        image: &ImageRgb8<'_>,
        food_type: &str,
    ) -> Result<NutritionEstimate, EstimateError> {
        self.check_input(image)?;
        self.run_stages(image, food_type)
    }

    /// Run every stage with timing and fallback reporting. The stages always
    /// execute; a successful estimate is still stored in the cache.
    pub fn process_with_diagnostics(&self, image: &ImageRgb8<'_>, food_type: &str) -> PipelineRun {
        let t0 = Instant::now();
        let mut timings = TimingBreakdown::default();
        let mut report = PipelineReport {
            input: InputDescriptor {
                width: image.w,
                height: image.h,
                food_type: food_type.to_string(),
                known_food: self.foods.contains(food_type),
            },
            segmentation: None,
            depth: None,
            volume: None,
            volume_rejection: None,
            estimate: None,
            error: None,
            timings: TimingBreakdown::default(),
        };

        if let Err(err) = self.check_input(image) {
            report.error = Some(err.to_string());
            report.timings.total_ms = t0.elapsed().as_secs_f64() * 1000.0;
            return PipelineRun {
                report,
                outcome: Err(err),
                mask: None,
                depth: None,
            };
        }

        let (mask, mask_source) =
            timings.time("segmentation", || self.segmenter.segment_with_source(image));
        report.segmentation = Some(SegmentationStage {
            source: mask_source,
            coverage: mask.coverage(),
            pixels: mask.count(),
        });

        let (depth, depth_source) =
            timings.time("depth", || self.depth.estimate_with_source(image));
        report.depth = Some(DepthStage {
            source: depth_source,
            mean_depth: mean_u8(&depth.data),
        });

        let volume = timings.time("volume", || {
            self.volume.compute_volume_detailed(&mask, &depth, food_type)
        });
        let outcome = match volume {
            Ok(breakdown) => {
                report.volume = Some(breakdown);
                timings.time("nutrition", || {
                    self.deriver.derive(breakdown.volume_cm3, food_type)
                })
            }
            Err(rejection) => {
                report.volume_rejection = Some(rejection);
                Err(EstimateError::VolumeDegenerate)
            }
        };

        match &outcome {
            Ok(estimate) => {
                let key = CacheKey::new(ImageDigest::of(image), food_type);
                report.estimate = Some(self.cache.insert(key, estimate.clone()));
            }
            Err(err) => report.error = Some(err.to_string()),
        }
        timings.total_ms = t0.elapsed().as_secs_f64() * 1000.0;
        report.timings = timings;

        PipelineRun {
            report,
            outcome,
            mask: Some(mask),
            depth: Some(depth),
        }
    }

    fn check_input(&self, image: &ImageRgb8<'_>) -> Result<(), EstimateError> {
        let min = self.params.min_image_side;
        if image.w < min || image.h < min {
            debug!(
                "NutritionPipeline: {}x{} input below {min}px, no estimate",
                image.w, image.h
            );
            return Err(EstimateError::InputTooSmall {
                width: image.w,
                height: image.h,
                min,
            });
        }
        image
            .check_layout()
            .map_err(|reason| EstimateError::InvalidImage { reason })
    }

    fn run_stages(
        &self,
        image: &ImageRgb8<'_>,
        food_type: &str,
    ) -> Result<NutritionEstimate, EstimateError> {
        let mask = self.segmenter.segment(image);
        let depth = self.depth.estimate(image);
        let volume = self.volume.compute_volume(&mask, &depth, food_type);
        if volume <= 0.0 {
            return Err(EstimateError::VolumeDegenerate);
        }
        self.deriver.derive(volume, food_type)
    }
}

fn mean_u8(data: &[u8]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|&v| v as u64).sum::<u64>() as f32 / data.len() as f32
}
