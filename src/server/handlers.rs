//! MCP tool handlers for the trip planner.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::cache::CacheStats;
use crate::domain::Destination;
use crate::error::PlanError;
use crate::metrics::{Metrics, MetricsSummary};
use crate::services::{LogProgress, TripPlanner};
use crate::tools::{SearchTools, WeatherTools};
use chrono::NaiveDate;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server that exposes trip planning tools.
#[derive(Clone)]
pub struct TripPlannerServer {
    planner: Arc<dyn TripPlanner>,
    weather: WeatherTools,
    search: SearchTools,
    metrics: Metrics,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for TripPlannerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "trip-planner".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Trip planner - builds day-by-day itineraries from destination weather, researched activities, and a local language model. Results are cached.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlanTripParams {
    /// City or region to visit
    pub destination: String,
    /// Trip length in days (1-30)
    pub duration_days: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWeatherParams {
    pub destination: String,
    /// Date as YYYY-MM-DD (default: today)
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchActivitiesParams {
    pub destination: String,
    /// Category such as "museums" or "restaurants"
    #[serde(default)]
    pub activity_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchWebParams {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CacheStatsResponse {
    caches: Vec<CacheStats>,
    metrics: MetricsSummary,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn invalid_params(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn plan_error(e: PlanError) -> McpError {
    if e.is_invalid_input() {
        invalid_params(e)
    } else {
        to_mcp_error(e)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).map_err(to_mcp_error)?,
    )]))
}

// Tool router implementation
#[tool_router]
impl TripPlannerServer {
    /// Create a new trip planner server.
    ///
    /// `search` should share its caches with the planner so direct searches
    /// and planning warm the same entries.
    pub fn new(
        planner: Arc<dyn TripPlanner>,
        weather: WeatherTools,
        search: SearchTools,
        metrics: Metrics,
    ) -> Self {
        Self {
            planner,
            weather,
            search,
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    /// Plan a complete trip.
    #[tool(
        description = "Plan a trip: fetches weather, researches top activities, and drafts a day-by-day itinerary with Morning/Afternoon/Evening sections. Plans are cached by destination and duration."
    )]
    async fn plan_trip(&self, params: Parameters<PlanTripParams>) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let plan = self
            .planner
            .plan_trip(&params.destination, params.duration_days, &LogProgress)
            .await
            .map_err(plan_error)?;

        json_result(&plan)
    }

    /// Get weather and recommendations for a destination.
    #[tool(description = "Get weather conditions and an activity/packing recommendation for a destination.")]
    async fn get_weather(&self, params: Parameters<GetWeatherParams>) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let destination = Destination::parse(&params.destination).map_err(invalid_params)?;

        let date = match params.date.as_deref() {
            Some(date) => Some(
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| invalid_params(format!("Invalid date '{}': {}", date, e)))?,
            ),
            None => None,
        };

        let report = self.weather.get_weather(destination.as_str(), date);
        json_result(&serde_json::json!({
            "report": report.report_text(),
            "raw": report,
        }))
    }

    /// Search for activities at a destination.
    #[tool(
        description = "Search for attractions and things to do at a destination, optionally filtered by category. Falls back to curated suggestions when search is unavailable."
    )]
    async fn search_activities(
        &self,
        params: Parameters<SearchActivitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let destination = Destination::parse(&params.destination).map_err(invalid_params)?;

        let result = self
            .search
            .search_activities(destination.as_str(), params.activity_type.as_deref())
            .await;

        json_result(&result)
    }

    /// General web search.
    #[tool(description = "General web search for travel information. Results are cached for repeated queries.")]
    async fn search_web(&self, params: Parameters<SearchWebParams>) -> Result<CallToolResult, McpError> {
        let params = params.0;
        if params.query.trim().is_empty() {
            return Err(invalid_params("Search query cannot be empty"));
        }

        let outcome = self.search.search_web(&params.query, params.max_results).await;
        json_result(&outcome)
    }

    /// Report cache sizes and counters.
    #[tool(description = "Show cache sizes, limits, hit rates, and request counters. Expired entries are dropped first.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        let purged = self.planner.purge_expired();
        tracing::debug!(purged, "Dropped expired cache entries");

        json_result(&CacheStatsResponse {
            caches: self.planner.cache_stats(),
            metrics: self.metrics.summary(),
        })
    }
}
