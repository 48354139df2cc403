//! File Configuration Source - analysis configuration from a JSON file.
//!
//! A missing file is not an error: the source logs it and serves the
//! built-in defaults, so a fresh deployment works before anyone writes a
//! configuration file.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::analysis::{default_global_configuration, GlobalAnalysisConfiguration};
use crate::ports::{ConfigurationSource, ConfigurationSourceError};

/// ConfigurationSource backed by a JSON file on disk.
pub struct FileConfigurationSource {
    path: PathBuf,
}

impl FileConfigurationSource {
    /// Creates a source reading from the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigurationSource for FileConfigurationSource {
    async fn load(&self) -> Result<GlobalAnalysisConfiguration, ConfigurationSourceError> {
        if !self.path.exists() {
            warn!(
                path = %self.path.display(),
                "analysis configuration file not found, using built-in defaults"
            );
            return Ok(default_global_configuration());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigurationSourceError::Read(e.to_string()))?;

        let configuration: GlobalAnalysisConfiguration = serde_json::from_str(&content)
            .map_err(|e| ConfigurationSourceError::Parse(e.to_string()))?;

        debug!(
            path = %self.path.display(),
            applications = configuration.applications.len(),
            "analysis configuration loaded"
        );
        Ok(configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_file_serves_built_in_defaults() {
        let source = FileConfigurationSource::new("/nonexistent/analysis-config.json");
        let configuration = source.load().await.unwrap();
        assert!(configuration.applications.contains_key("AppSalud"));
        assert!(configuration.applications.contains_key("LinaChatbot"));
    }

    #[tokio::test]
    async fn valid_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"applications":{{"MyApp":{{"responseTimeThresholds":{{"default":1500}},"errorPatterns":{{"critical":["Fatal"],"warning":[]}},"recurrenceThreshold":5}}}}}}"#
        )
        .unwrap();

        let source = FileConfigurationSource::new(file.path());
        let configuration = source.load().await.unwrap();
        let my_app = configuration.configuration_for("MyApp");
        assert_eq!(my_app.threshold_for(None), 1500);
        assert_eq!(my_app.recurrence_threshold, 5);
        assert!(my_app.is_critical("Fatal error while reading"));
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let source = FileConfigurationSource::new(file.path());
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, ConfigurationSourceError::Parse(_)));
    }
}
