//! OpenAI chat completions backend

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::InferenceBackend;
use crate::config::InferenceConfig;
use crate::{Error, Result};

/// Chat completions response (only the parts we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Backend calling an OpenAI-compatible chat completions endpoint
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiBackend {
    /// Create a backend from configuration and an API key
    pub fn new(config: &InferenceConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: config.model.clone(),
            api_url: config.api_url.clone(),
        }
    }

    /// Get the model identifier sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request body for one user message
    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        })
    }
}

impl std::fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Pull the first choice's text out of a completions response
fn extract_text(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::Backend("Response contained no choices".to_string()))?;

    choice
        .message
        .content
        .ok_or_else(|| Error::Backend("First choice has no message content".to_string()))
}

#[async_trait]
impl InferenceBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_bytes = prompt.len(), "Requesting completion");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::Backend(format!(
                "Completion request failed with status {}: {}",
                status, text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("Failed to parse completion response: {}", e)))?;

        let text = extract_text(body)?;
        info!(model = %self.model, response_bytes = text.len(), "Completion received");
        Ok(text)
    }
}
