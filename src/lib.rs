//! Trip Planner - an MCP server that plans trips with a local language model.
//!
//! Plans combine destination weather, web-researched activities, and a
//! model-drafted itinerary. Search results and finished plans are held in
//! bounded caches with TTL expiry and FIFO eviction.
//!
//! # Architecture
//!
//! - **cache**: Bounded TTL cache, shared handle, and normalized keys
//! - **domain**: Validated destination and trip duration
//! - **models**: Weather, activity, and trip plan data structures
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP clients for Ollama and DuckDuckGo
//! - **tools**: Weather, search, and itinerary tools
//! - **services**: Trip planning orchestration
//! - **server**: MCP protocol server

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod services;
pub mod tools;

// Re-export commonly used types
pub use cache::{BoundedCache, CacheConfig, CacheKey, SharedCache};
pub use client::{DuckDuckGoClient, OllamaClient};
pub use config::Config;
pub use error::{ApiError, ConfigError, PlanError};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{Activity, ActivitySearch, SearchHit, SearchOutcome, TripPlan, WeatherReport};
pub use server::TripPlannerServer;
pub use services::{TripPlanner, TripPlannerService};
pub use tools::{ItineraryTools, SearchTools, WeatherTools};
