//! Optional post-processing of a drafted itinerary.
//!
//! Stages run in order over a shared [`Draft`]. A failing stage is logged and
//! skipped; the draft keeps whatever the earlier stages produced.

use super::progress::ProgressReporter;
use crate::config::Config;
use crate::error::ApiResult;
use crate::tools::ItineraryTools;
use async_trait::async_trait;
use std::sync::Arc;

/// Working state handed from stage to stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub destination: String,
    pub days: u32,
    pub weather_report: String,
    pub itinerary: String,
    pub critique: Option<String>,
}

/// One post-processing step.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Progress percentage and message reported before the stage runs.
    fn progress(&self) -> (u8, &'static str);

    async fn apply(&self, draft: &mut Draft) -> ApiResult<()>;
}

/// Adds a critique of the current itinerary.
pub struct CritiqueStage {
    tools: Arc<ItineraryTools>,
}

impl CritiqueStage {
    pub fn new(tools: Arc<ItineraryTools>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl PipelineStage for CritiqueStage {
    fn name(&self) -> &'static str {
        "critique"
    }

    fn progress(&self) -> (u8, &'static str) {
        (85, "Reviewing itinerary quality...")
    }

    async fn apply(&self, draft: &mut Draft) -> ApiResult<()> {
        let critique = self
            .tools
            .critique_itinerary(&draft.itinerary, &draft.destination, draft.days, &draft.weather_report)
            .await?;
        draft.critique = Some(critique);
        Ok(())
    }
}

/// Rewrites the itinerary to address the critique. No-op without one.
pub struct RefineStage {
    tools: Arc<ItineraryTools>,
}

impl RefineStage {
    pub fn new(tools: Arc<ItineraryTools>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl PipelineStage for RefineStage {
    fn name(&self) -> &'static str {
        "refine"
    }

    fn progress(&self) -> (u8, &'static str) {
        (90, "Refining itinerary...")
    }

    async fn apply(&self, draft: &mut Draft) -> ApiResult<()> {
        let Some(critique) = draft.critique.as_deref().filter(|c| !c.is_empty()) else {
            tracing::debug!("No critique, skipping refinement");
            return Ok(());
        };

        let refined = self
            .tools
            .refine_itinerary(&draft.itinerary, critique, &draft.destination, draft.days)
            .await?;
        draft.itinerary = refined;
        Ok(())
    }
}

/// Which stages ran successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub completed: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

impl PipelineReport {
    pub fn succeeded(&self, stage: &str) -> bool {
        self.completed.iter().any(|name| *name == stage)
    }
}

/// Ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn PipelineStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages enabled by `enable_critique` / `enable_refinement`.
    pub fn from_config(config: &Config, tools: Arc<ItineraryTools>) -> Self {
        let mut pipeline = Self::new();
        if config.enable_critique {
            pipeline = pipeline.with_stage(CritiqueStage::new(tools.clone()));
        }
        if config.enable_refinement {
            pipeline = pipeline.with_stage(RefineStage::new(tools));
        }
        pipeline
    }

    pub fn with_stage(mut self, stage: impl PipelineStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over `draft`.
    pub async fn run(&self, draft: &mut Draft, progress: &dyn ProgressReporter) -> PipelineReport {
        let mut report = PipelineReport::default();

        for stage in &self.stages {
            let (percent, message) = stage.progress();
            progress.report(percent, message);

            match stage.apply(draft).await {
                Ok(()) => report.completed.push(stage.name()),
                Err(e) => {
                    tracing::warn!(stage = stage.name(), "Pipeline stage failed: {}", e);
                    report.failed.push(stage.name());
                }
            }
        }

        report
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
