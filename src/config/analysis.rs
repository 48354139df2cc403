//! Analysis configuration section

use serde::Deserialize;

use super::error::ValidationError;

/// Analysis pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Path to the per-application analysis configuration file. A missing
    /// file falls back to the built-in defaults.
    #[serde(default = "default_configuration_file")]
    pub configuration_file: String,

    /// Default per-table record ceiling when a request sends none.
    #[serde(default = "default_max_records")]
    pub default_max_records: usize,
}

impl AnalysisSettings {
    /// Validate analysis settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.configuration_file.is_empty() {
            return Err(ValidationError::MissingRequired(
                "ANALYSIS__CONFIGURATION_FILE",
            ));
        }
        if self.default_max_records == 0 {
            return Err(ValidationError::InvalidMaxRecords);
        }
        Ok(())
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            configuration_file: default_configuration_file(),
            default_max_records: default_max_records(),
        }
    }
}

fn default_configuration_file() -> String {
    "analysis-config.json".to_string()
}

fn default_max_records() -> usize {
    10
}
