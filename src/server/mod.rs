//! MCP server implementation for the trip planner.
//!
//! This module provides the MCP protocol server that exposes trip planning
//! to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::TripPlannerServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the trip planner server with stdio transport.
///
/// Communicates via stdin/stdout using the MCP protocol and returns once the
/// client disconnects.
pub async fn run_server(server: TripPlannerServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
