//! Configuration Source Port - backing source for analysis configuration.

use async_trait::async_trait;

use crate::domain::analysis::GlobalAnalysisConfiguration;

/// Port for loading the global analysis configuration.
///
/// Absence of an entry for a requested application is not an error; the
/// domain substitutes built-in defaults. Loading itself can fail (unreadable
/// file, malformed content).
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    /// Loads the complete per-application configuration mapping.
    async fn load(&self) -> Result<GlobalAnalysisConfiguration, ConfigurationSourceError>;
}

/// Configuration source errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationSourceError {
    /// The backing source could not be read.
    #[error("configuration read failed: {0}")]
    Read(String),

    /// The backing source content could not be parsed.
    #[error("configuration parse failed: {0}")]
    Parse(String),
}
