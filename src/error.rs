//! Error types for the trip planner.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! None of them can reach a cache: search and model failures resolve to
//! fallback payloads or are returned to the caller uncached.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when calling the model runtime or the search API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Upstream returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Endpoint not found (wrong base URL or model name)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Upstream answered but with nothing usable
    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors that can occur while planning a trip.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Destination or duration rejected before any work was done
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The model could not produce an initial itinerary
    #[error("Failed to create itinerary: {0}")]
    Itinerary(#[source] ApiError),
}

impl PlanError {
    /// Whether the caller supplied bad input (as opposed to an upstream failure).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PlanError::Invalid(_))
    }
}

/// Convenience type alias for Results with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with PlanError
pub type PlanResult<T> = Result<T, PlanError>;
