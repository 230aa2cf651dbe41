//! Chat-model access for the generation nodes.
//!
//! [`ChatModel`] is the seam the FAQ and comparison nodes depend on, so tests
//! substitute scripted models and never touch the network. [`MistralClient`]
//! is the production implementation: one chat-completions POST per prompt,
//! with a client-side request timeout (nodes enforce their own timeouts; the
//! scheduler never preempts).

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::node::NodeError;

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

const DEFAULT_MODEL: &str = "mistral-large-latest";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.4;

/// A model that completes a prompt with text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, NodeError>;
}

/// Configuration failures constructing a [`MistralClient`].
#[derive(Debug, Error, Diagnostic)]
pub enum LlmConfigError {
    #[error("MISTRAL_API_KEY is not set")]
    #[diagnostic(
        code(plait::llm::missing_api_key),
        help("Set MISTRAL_API_KEY in the environment or a .env file.")
    )]
    MissingApiKey,

    #[error("failed to construct HTTP client: {0}")]
    #[diagnostic(code(plait::llm::http_client))]
    HttpClient(#[from] reqwest::Error),
}

/// Chat-completions client for the Mistral API.
pub struct MistralClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl MistralClient {
    /// Builds a client with the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmConfigError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Builds a client from `MISTRAL_API_KEY`, honoring an optional
    /// `MISTRAL_API_URL` endpoint override.
    pub fn from_env() -> Result<Self, LlmConfigError> {
        let api_key =
            std::env::var("MISTRAL_API_KEY").map_err(|_| LlmConfigError::MissingApiKey)?;
        let mut client = Self::new(api_key)?;
        if let Ok(endpoint) = std::env::var("MISTRAL_API_URL") {
            client.endpoint = endpoint;
        }
        Ok(client)
    }

    /// Overrides the chat-completions endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

fn provider_error(message: impl ToString) -> NodeError {
    NodeError::Provider {
        provider: "mistral",
        message: message.to_string(),
    }
}

#[async_trait]
impl ChatModel for MistralClient {
    async fn complete(&self, prompt: &str) -> Result<String, NodeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(provider_error)?
            .error_for_status()
            .map_err(provider_error)?;

        let body: ChatResponse = response.json().await.map_err(provider_error)?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| provider_error("response contained no choices"))
    }
}
