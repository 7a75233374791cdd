//! Trip planning service.
//!
//! Orchestrates weather lookup, activity research, itinerary drafting, and
//! the optional critique/refine pipeline, caching complete plans by
//! destination and duration.

use super::pipeline::{Draft, Pipeline};
use super::progress::ProgressReporter;
use crate::cache::{CacheKey, CacheStats, Clock, SharedCache, SystemClock};
use crate::config::Config;
use crate::domain::{Destination, TripDuration};
use crate::error::{PlanError, PlanResult};
use crate::metrics::Metrics;
use crate::models::{ItinerarySection, ProcessSummary, TripPlan, WeatherSection};
use crate::tools::{ItineraryTools, SearchTools, WeatherTools};
use async_trait::async_trait;
use std::sync::Arc;

/// Steps a full (uncached) plan goes through.
pub const PLAN_STEPS: u8 = 5;

/// Trip planner service trait.
#[async_trait]
pub trait TripPlanner: Send + Sync {
    /// Plan a trip of `days` days to `destination`.
    ///
    /// # Errors
    /// `PlanError::Invalid` for a bad destination or duration (nothing is
    /// fetched), `PlanError::Itinerary` when no itinerary could be drafted.
    /// Failed plans are never cached.
    async fn plan_trip(
        &self,
        destination: &str,
        days: i64,
        progress: &dyn ProgressReporter,
    ) -> PlanResult<TripPlan>;

    /// Size and hit counters for every cache the planner owns.
    fn cache_stats(&self) -> Vec<CacheStats>;

    /// Drop expired entries from every cache. Returns how many were removed.
    fn purge_expired(&self) -> usize;
}

/// Default implementation of TripPlanner.
pub struct TripPlannerService {
    weather: WeatherTools,
    search: SearchTools,
    itinerary: Arc<ItineraryTools>,
    pipeline: Pipeline,
    plan_cache: SharedCache<CacheKey, TripPlan>,
}

impl TripPlannerService {
    /// Create a planner; the pipeline is built from the config flags.
    pub fn new(
        weather: WeatherTools,
        search: SearchTools,
        itinerary: Arc<ItineraryTools>,
        config: &Config,
    ) -> Self {
        let pipeline = Pipeline::from_config(config, itinerary.clone());
        Self::with_parts(weather, search, itinerary, pipeline, config, Arc::new(SystemClock))
    }

    /// Create a planner with an explicit pipeline and plan cache clock.
    pub fn with_parts(
        weather: WeatherTools,
        search: SearchTools,
        itinerary: Arc<ItineraryTools>,
        pipeline: Pipeline,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        tracing::debug!(stages = ?pipeline.stage_names(), "Planner pipeline");
        Self {
            weather,
            search,
            itinerary,
            pipeline,
            plan_cache: SharedCache::with_clock("trip_plans", config.plan_cache(), clock),
        }
    }

    /// Record plan cache hits and misses into a shared collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.plan_cache = self.plan_cache.with_metrics(metrics);
        self
    }

    pub fn weather(&self) -> &WeatherTools {
        &self.weather
    }

    pub fn search(&self) -> &SearchTools {
        &self.search
    }

    async fn build_plan(
        &self,
        destination: &Destination,
        days: u32,
        progress: &dyn ProgressReporter,
    ) -> PlanResult<TripPlan> {
        tracing::info!(destination = %destination, days, "Planning trip");

        progress.report(30, "Getting weather information...");
        let weather = self.weather.get_weather(destination.as_str(), None);
        let weather_report = weather.report_text();

        progress.report(45, "Finding top attractions...");
        let activities = self.search.research_activities(destination.as_str(), &[]).await;

        progress.report(70, "Creating your itinerary...");
        let initial = self
            .itinerary
            .create_itinerary(destination.as_str(), days, &activities.research, &weather_report)
            .await
            .map_err(|e| {
                tracing::error!(destination = %destination, "Itinerary drafting failed: {}", e);
                PlanError::Itinerary(e)
            })?;

        let mut draft = Draft {
            destination: destination.to_string(),
            days,
            weather_report: weather_report.clone(),
            itinerary: initial.clone(),
            critique: None,
        };
        let stages = self.pipeline.run(&mut draft, progress).await;

        progress.report(95, "Finalizing your trip plan...");
        Ok(TripPlan {
            destination: destination.as_str().to_string(),
            duration: days,
            weather: WeatherSection {
                report: weather_report,
                raw: weather,
            },
            activities,
            itinerary: ItinerarySection {
                initial,
                final_itinerary: draft.itinerary,
                critique: draft.critique.unwrap_or_default(),
            },
            process: ProcessSummary {
                steps_completed: PLAN_STEPS,
                weather_success: true,
                activity_success: true,
                itinerary_success: true,
                critique_success: stages.succeeded("critique"),
            },
        })
    }
}

#[async_trait]
impl TripPlanner for TripPlannerService {
    async fn plan_trip(
        &self,
        destination: &str,
        days: i64,
        progress: &dyn ProgressReporter,
    ) -> PlanResult<TripPlan> {
        let destination = Destination::parse(destination)?;
        let duration = TripDuration::new(days)?;
        let days = duration.days();
        let key = CacheKey::trip(destination.as_str(), days);

        let (plan, from_cache) = self
            .plan_cache
            .get_or_try_insert_with(key.clone(), || self.build_plan(&destination, days, progress))
            .await?;

        if from_cache {
            tracing::debug!(key = %key, "Serving cached trip plan");
            progress.report(100, "Using cached result...");
        }
        Ok(plan)
    }

    fn cache_stats(&self) -> Vec<CacheStats> {
        vec![
            self.plan_cache.stats(),
            self.search.web_cache_stats(),
            self.search.activity_cache_stats(),
        ]
    }

    fn purge_expired(&self) -> usize {
        self.plan_cache.purge_expired() + self.search.purge_expired()
    }
}
