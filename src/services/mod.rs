//! Application service layer.
//!
//! The planner orchestrates the tools into a complete trip plan and owns the
//! plan cache. MCP handlers talk to it through the [`TripPlanner`] trait.

mod pipeline;
mod planner;
mod progress;

pub use pipeline::{CritiqueStage, Draft, Pipeline, PipelineReport, PipelineStage, RefineStage};
pub use planner::{TripPlanner, TripPlannerService, PLAN_STEPS};
pub use progress::{LogProgress, NoProgress, ProgressReporter};
