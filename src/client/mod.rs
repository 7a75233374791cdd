//! HTTP clients for the model runtime and the web search API.
//!
//! Both clients are synchronous (`ureq`) and are called from async contexts
//! via `tokio::task::spawn_blocking` through the [`LanguageModel`] and
//! [`WebSearch`] traits. They share status/transport error mapping and
//! record request timings into a [`Metrics`](crate::metrics::Metrics) collector.

mod async_wrapper;
mod ollama;
mod search;

pub use async_wrapper::{AsyncOllamaClient, AsyncSearchClient, LanguageModel, WebSearch};
pub use ollama::OllamaClient;
pub use search::DuckDuckGoClient;

use crate::error::ApiError;

/// Map a ureq error to an ApiError.
pub(crate) fn map_error(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(code, response) => {
            let message = response
                .into_string()
                .unwrap_or_else(|_| "Unknown error".to_string());

            match code {
                404 => ApiError::NotFound(message),
                429 => ApiError::RateLimitExceeded,
                _ => ApiError::ApiError {
                    status: code,
                    message,
                },
            }
        }
        ureq::Error::Transport(transport) => {
            if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                ApiError::HttpError("Connection failed".to_string())
            } else if transport.kind() == ureq::ErrorKind::Io {
                ApiError::Timeout
            } else {
                ApiError::HttpError(transport.to_string())
            }
        }
    }
}

/// Join a base URL and a path with exactly one `/` between them.
pub(crate) fn build_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
