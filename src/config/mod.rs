pub mod estimate;

pub use estimate::{load_config, EstimateToolConfig, OutputConfig};
