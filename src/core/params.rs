use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::grid::GridSpec;
use crate::core::sampler::ClassificationRule;
use crate::error::Result;
use crate::types::{Execution, OutputFormat};

/// Scan parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanParams {
    pub grid: GridSpec,
    #[serde(default)]
    pub rule: ClassificationRule,
    #[serde(default)]
    pub execution: Execution,
    /// Report format used when writing to disk
    #[serde(default)]
    pub format: OutputFormat,
}

impl ScanParams {
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            rule: ClassificationRule::default(),
            execution: Execution::default(),
            format: OutputFormat::default(),
        }
    }

    /// Load parameters from a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: ScanParams = serde_json::from_str(&text)?;
        params.grid.validate()?;
        Ok(params)
    }
}
