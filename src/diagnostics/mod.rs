//! Diagnostics returned by
//! [`NutritionPipeline::process_with_diagnostics`](crate::NutritionPipeline::process_with_diagnostics):
//! which fallback each stage took, the volume integration quantities and
//! per-stage timings.

pub mod report;
pub mod timing;

pub use report::{DepthStage, InputDescriptor, PipelineReport, PipelineRun, SegmentationStage};
pub use timing::{StageTiming, TimingBreakdown};
