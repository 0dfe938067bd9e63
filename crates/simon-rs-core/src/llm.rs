//! HTTP client for an Ollama-compatible chat service.

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use simon_rs_config::LlmConfig;
use simon_rs_protocol::{ChatMessage, ChatOptions, ChatProvider, LlmError};

/// Chat backend speaking the Ollama `/api/chat` protocol.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// Build a client for the configured endpoint and request timeout.
    pub fn new(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Names of the models the service has available.
    ///
    /// Used at startup to warn early when the service is down or the model is missing.
    pub async fn health(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.endpoint);
        let body = self.read_body(self.client.get(&url)).await?;
        let tags: TagsResponse =
            serde_json::from_str(&body).map_err(|err| LlmError::Decode(err.to_string()))?;
        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }

    async fn read_body(&self, request: reqwest::RequestBuilder) -> Result<String, LlmError> {
        let response = request
            .send()
            .await
            .map_err(|err| LlmError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| LlmError::Transport(err.to_string()))?;
        if !status.is_success() {
            warn!("llm service returned error (status={status})");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ChatProvider for OllamaClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);
        debug!(
            "sending chat request (model={}, messages={})",
            options.model,
            messages.len()
        );
        let request = ChatRequest {
            model: &options.model,
            messages,
            stream: false,
            options: RequestOptions {
                temperature: options.temperature,
            },
        };
        let body = self.read_body(self.client.post(&url).json(&request)).await?;
        let reply: ChatResponse =
            serde_json::from_str(&body).map_err(|err| LlmError::Decode(err.to_string()))?;
        Ok(reply.message.content)
    }
}
