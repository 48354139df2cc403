//! LLM provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// LLM provider configuration (Azure OpenAI-compatible deployment)
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Service endpoint, e.g. https://myresource.openai.azure.com
    #[serde(default)]
    pub endpoint: String,

    /// API key for the deployment
    #[serde(default)]
    pub api_key: String,

    /// Deployment (model) name
    #[serde(default)]
    pub deployment: String,

    /// API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate LLM configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.is_empty() {
            return Err(ValidationError::MissingRequired("LLM__ENDPOINT"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ValidationError::InvalidLlmEndpoint);
        }
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("LLM__API_KEY"));
        }
        if self.deployment.is_empty() {
            return Err(ValidationError::MissingRequired("LLM__DEPLOYMENT"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidLlmTimeout);
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_version() -> String {
    "2024-02-15-preview".to_string()
}

fn default_timeout() -> u64 {
    60
}
