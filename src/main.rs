//! Trip Planner - Main entry point
//!
//! Runs the trip planner as a Model Context Protocol (MCP) server over stdio.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use trip_planner::client::{AsyncOllamaClient, AsyncSearchClient, LanguageModel, WebSearch};
use trip_planner::services::TripPlanner;
use trip_planner::{
    Config, DuckDuckGoClient, ItineraryTools, Metrics, OllamaClient, SearchTools,
    TripPlannerServer, TripPlannerService, WeatherTools,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Configuration is loaded first so LOG_LEVEL can seed the filter.
    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let default_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting trip planner with model {} at {}",
        config.ollama_model, config.ollama_base_url
    );

    let metrics = Metrics::new();

    // Initialize HTTP clients
    let model = Arc::new(AsyncOllamaClient::new(
        OllamaClient::new(&config).with_metrics(metrics.clone()),
    )) as Arc<dyn LanguageModel>;
    let search_client = Arc::new(AsyncSearchClient::new(
        DuckDuckGoClient::new(&config).with_metrics(metrics.clone()),
    )) as Arc<dyn WebSearch>;

    // Tools share caches with the planner through cheap clones
    let weather = WeatherTools::default();
    let search = SearchTools::new(search_client, &config).with_metrics(metrics.clone());
    let itinerary = Arc::new(ItineraryTools::new(model));

    let planner = Arc::new(
        TripPlannerService::new(weather.clone(), search.clone(), itinerary, &config)
            .with_metrics(metrics.clone()),
    ) as Arc<dyn TripPlanner>;

    let server = TripPlannerServer::new(planner, weather, search, metrics);

    info!(
        "Cache limits: plans {} entries / {}s, searches {} entries / {}s",
        config.plan_cache_capacity,
        config.plan_cache_ttl_secs,
        config.search_cache_capacity,
        config.search_cache_ttl_secs
    );
    info!(
        "Critique: {}, refinement: {}",
        config.enable_critique, config.enable_refinement
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    trip_planner::server::run_server(server).await?;

    info!("Trip planner shutdown complete");
    Ok(())
}
