//! JSON configuration of the `food_estimate` tool.
//!
//! ```json
//! {
//!   "input": "meal.jpg",
//!   "food_type": "pizza",
//!   "pipeline": { "segmenter": { "texture_min_detail": 0.0 } },
//!   "foods": { "soup": { ... } },
//!   "output": { "json_out": "out/report.json", "debug_dir": "out/debug" }
//! }
//! ```
use crate::food::{FoodTable, FoodTypeParams};
use crate::pipeline::PipelineParams;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the JSON report. Printed to stdout when absent.
    pub json_out: Option<PathBuf>,
    /// Directory for `mask.png` and `depth.png`.
    pub debug_dir: Option<PathBuf>,
    /// Suppress the text summary.
    pub quiet: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EstimateToolConfig {
    pub input: PathBuf,
    pub food_type: String,
    #[serde(default)]
    pub pipeline: PipelineParams,
    /// Extra or replacement food entries, keyed by label.
    #[serde(default)]
    pub foods: BTreeMap<String, FoodTypeParams>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl EstimateToolConfig {
    /// Built-in food table with this config's overrides applied. Fails if
    /// any override is not physically meaningful.
    pub fn food_table(&self) -> Result<FoodTable, String> {
        FoodTable::with_overrides(self.foods.clone())
    }
}

/// Read, parse and validate a tool config.
pub fn load_config(path: &Path) -> Result<EstimateToolConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config = parse_config(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    config
        .food_table()
        .map_err(|e| format!("Invalid config {}: {e}", path.display()))?;
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<EstimateToolConfig, serde_json::Error> {
    serde_json::from_str(contents)
}
