use thiserror::Error;

/// Explicit "no estimate" outcomes of the pipeline.
///
/// Segmentation and depth problems never show up here: those stages fall back
/// to a geometric mask or a uniform depth map and report the fallback through
/// [`PipelineReport`](crate::diagnostics::PipelineReport) instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("image {width}x{height} is below the {min}px minimum side")]
    InputTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    #[error("invalid image buffer: {reason}")]
    InvalidImage { reason: String },
    #[error("no usable food region for a volume estimate")]
    VolumeDegenerate,
    #[error("cannot derive nutrition from volume {volume_cm3} cm3")]
    NutritionDegenerate { volume_cm3: f32 },
}
