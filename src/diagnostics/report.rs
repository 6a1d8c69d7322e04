use crate::depth::DepthSource;
use crate::diagnostics::TimingBreakdown;
use crate::error::EstimateError;
use crate::image::{DepthMap, Mask};
use crate::nutrition::NutritionEstimate;
use crate::segment::MaskSource;
use crate::volume::{VolumeBreakdown, VolumeRejection};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub food_type: String,
    /// `false` when the label fell back to the default food entry.
    pub known_food: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationStage {
    pub source: MaskSource,
    pub coverage: f32,
    pub pixels: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthStage {
    pub source: DepthSource,
    pub mean_depth: f32,
}

/// Serializable trace of one pipeline run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub input: InputDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<SegmentationStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<DepthStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_rejection: Option<VolumeRejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<NutritionEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timings: TimingBreakdown,
}

/// Report plus the transient artefacts of the run, for debugging tools.
#[derive(Clone, Debug)]
pub struct PipelineRun {
    pub report: PipelineReport,
    pub outcome: Result<NutritionEstimate, EstimateError>,
    pub mask: Option<Mask>,
    pub depth: Option<DepthMap>,
}
