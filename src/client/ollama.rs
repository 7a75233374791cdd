//! Chat completions against a local Ollama runtime.
//!
//! Ollama exposes an OpenAI-compatible `/v1/chat/completions` endpoint; only
//! the single non-streaming request/response shape is used here.

use super::map_error;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for an Ollama model.
#[derive(Clone)]
pub struct OllamaClient {
    /// Full chat completions URL
    endpoint: String,

    /// Model name
    model: String,

    temperature: f32,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl OllamaClient {
    /// Create a new OllamaClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.llm_timeout))
            .build();

        Self {
            endpoint: config.chat_completions_url(),
            model: config.ollama_model.clone(),
            temperature: config.llm_temperature,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a client for an explicit endpoint (useful for testing).
    #[doc(hidden)]
    pub fn with_endpoint(endpoint: String, model: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            endpoint,
            model,
            temperature: 0.5,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Record into a shared collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Model name requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user message pair and return the reply text.
    ///
    /// # Errors
    /// `EmptyResponse` when the model answers with no content.
    pub fn chat(&self, system: &str, prompt: &str) -> ApiResult<String> {
        let start = Instant::now();

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            stream: false,
        };
        let body = serde_json::to_value(&request)?;

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "POST {}", self.endpoint);

        let result = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(map_error);

        let duration = start.elapsed();
        self.metrics.record_http_request(duration);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("POST {} - Error: {:?}", self.endpoint, e);
                self.metrics.record_http_error();
                return Err(e);
            }
        };

        let body = response
            .into_string()
            .map_err(|e| ApiError::HttpError(e.to_string()))?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ApiError::EmptyResponse(format!("model {}", self.model)))?;

        self.metrics.record_llm_completion();
        tracing::debug!(
            duration_ms = duration.as_millis() as u64,
            reply_len = content.len(),
            "Model reply received"
        );

        Ok(content)
    }
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}
