#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod food;
pub mod image;
pub mod nutrition;
pub mod pipeline;

// Stage modules, usable on their own.
pub mod depth;
pub mod imgproc;
pub mod segment;
pub mod volume;

// --- High-level re-exports -------------------------------------------------

pub use crate::cache::{CacheKey, ImageDigest, ResultCache};
pub use crate::depth::{DepthSource, PseudoDepthEstimator};
pub use crate::error::EstimateError;
pub use crate::food::{FoodCategory, FoodTable, FoodTypeParams, MacroRatio};
pub use crate::nutrition::{NutritionDeriver, NutritionEstimate};
pub use crate::pipeline::{NutritionPipeline, PipelineParams};
pub use crate::segment::{is_valid_mask, ForegroundSegmenter, MaskSource};
pub use crate::volume::VolumetricEstimator;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use food_volume::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let rgb = vec![128u8; w * h * 3];
/// let img = ImageRgb8::packed(w, h, &rgb);
///
/// let pipeline = NutritionPipeline::default();
/// match pipeline.estimate(&img, "pizza") {
///     Ok(n) => println!("kcal={:.0} mass={:.0}g", n.calories, n.mass_g),
///     Err(err) => println!("no estimate: {err}"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageRgb8;
    pub use crate::{EstimateError, NutritionEstimate, NutritionPipeline, PipelineParams};
}
