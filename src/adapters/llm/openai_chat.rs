//! OpenAI Chat Adapter - ChatModel implementation over an Azure
//! OpenAI-compatible chat completions endpoint.
//!
//! Authenticates with the `api-key` header and addresses a deployment by
//! name, as Azure-hosted deployments do. The completion call is a single
//! request/response; no streaming.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{ChatModel, ChatModelError};

/// Configuration for the OpenAI chat adapter.
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Service endpoint, e.g. "https://myresource.openai.azure.com".
    pub endpoint: String,
    /// Deployment (model) name to address.
    pub deployment: String,
    /// API version query parameter.
    pub api_version: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token ceiling.
    pub max_tokens: u32,
}

impl OpenAiChatConfig {
    /// Creates a configuration with the given endpoint, deployment, and key.
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: "2024-02-15-preview".to_string(),
            timeout: Duration::from_secs(60),
            temperature: 0.1,
            max_tokens: 2000,
        }
    }

    /// Sets the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// ChatModel implementation over reqwest.
pub struct OpenAiChatModel {
    config: OpenAiChatConfig,
    client: Client,
}

impl OpenAiChatModel {
    /// Creates the adapter with a dedicated HTTP client.
    pub fn new(config: OpenAiChatConfig) -> Result<Self, ChatModelError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChatModelError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the deployment-scoped chat completions URL.
    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    async fn send(&self, body: &ChatRequest) -> Result<Response, ChatModelError> {
        self.client
            .post(self.completions_url())
            .header("api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatModelError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    ChatModelError::network(format!("connection failed: {}", e))
                } else {
                    ChatModelError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses into transport errors.
    async fn handle_status(response: Response) -> Result<Response, ChatModelError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(ChatModelError::AuthenticationFailed),
            code => Err(ChatModelError::provider(code, body)),
        }
    }

    async fn parse_completion(response: Response) -> Result<String, ChatModelError> {
        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatModelError::parse(format!("failed to decode response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatModelError::parse("no choices in response"))?;

        Ok(choice.message.content)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, ChatModelError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self.send(&request).await?;
        let response = Self::handle_status(response).await?;
        Self::parse_completion(response).await
    }

    async fn probe(&self) -> Result<(), ChatModelError> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "ping".to_string(),
            }],
            temperature: 0.0,
            max_tokens: 1,
        };

        let response = self.send(&request).await?;
        Self::handle_status(response).await?;
        Ok(())
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_is_deployment_scoped() {
        let config = OpenAiChatConfig::new(
            "https://myresource.openai.azure.com/",
            "gpt-4o-mini",
            "key",
        )
        .with_api_version("2024-06-01");
        let model = OpenAiChatModel::new(config).unwrap();

        assert_eq!(
            model.completions_url(),
            "https://myresource.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn config_defaults() {
        let config = OpenAiChatConfig::new("https://e", "d", "secret-key");
        assert_eq!(config.api_version, "2024-02-15-preview");
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.api_key(), "secret-key");
    }

    #[test]
    fn response_decodes_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"summary\":\"ok\"}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "{\"summary\":\"ok\"}");
    }
}
