use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::depth::DepthParams;
use crate::nutrition::NutritionParams;
use crate::segment::SegmenterParams;
use crate::volume::VolumeParams;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters. Every field has a default, so a partial JSON
/// object is enough to override a single knob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Images with either side below this many pixels are rejected outright.
    pub min_image_side: usize,
    /// Maximum number of memoized results.
    pub cache_capacity: usize,
    pub segmenter: SegmenterParams,
    pub depth: DepthParams,
    pub volume: VolumeParams,
    pub nutrition: NutritionParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            min_image_side: 50,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            segmenter: SegmenterParams::default(),
            depth: DepthParams::default(),
            volume: VolumeParams::default(),
            nutrition: NutritionParams::default(),
        }
    }
}
