//! Async interfaces over the synchronous HTTP clients.
//!
//! Calls run on tokio's blocking pool via `tokio::task::spawn_blocking` so a
//! slow model or search request never stalls the async runtime. The traits
//! are also the seam tests use to substitute scripted backends.

use crate::client::{DuckDuckGoClient, OllamaClient};
use crate::error::{ApiError, ApiResult};
use crate::models::SearchHit;
use async_trait::async_trait;
use std::sync::Arc;

/// A chat model that answers one system + user prompt pair.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> ApiResult<String>;
}

/// A web search backend.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> ApiResult<Vec<SearchHit>>;
}

/// Async wrapper around [`OllamaClient`].
#[derive(Clone)]
pub struct AsyncOllamaClient {
    client: Arc<OllamaClient>,
}

impl AsyncOllamaClient {
    pub fn new(client: OllamaClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl LanguageModel for AsyncOllamaClient {
    async fn complete(&self, system: &str, prompt: &str) -> ApiResult<String> {
        let client = self.client.clone();
        let system = system.to_string();
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || client.chat(&system, &prompt))
            .await
            .map_err(|e| ApiError::HttpError(format!("Task join error: {}", e)))?
    }
}

/// Async wrapper around [`DuckDuckGoClient`].
#[derive(Clone)]
pub struct AsyncSearchClient {
    client: Arc<DuckDuckGoClient>,
}

impl AsyncSearchClient {
    pub fn new(client: DuckDuckGoClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl WebSearch for AsyncSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> ApiResult<Vec<SearchHit>> {
        let client = self.client.clone();
        let query = query.to_string();

        tokio::task::spawn_blocking(move || client.search(&query, max_results))
            .await
            .map_err(|e| ApiError::HttpError(format!("Task join error: {}", e)))?
    }
}
