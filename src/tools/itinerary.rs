//! Itinerary drafting, critique, and refinement through a [`LanguageModel`].

use crate::client::LanguageModel;
use crate::error::{ApiError, ApiResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

const PLANNER_SYSTEM: &str = "Create concise day-by-day travel itineraries with \
Morning/Afternoon/Evening activities, meals, and tips. Be realistic with time allocations. \
Write in a friendly, narrative style. End with TERMINATE.";

const CRITIC_SYSTEM: &str = "You are an expert travel itinerary critic. Review trip itineraries \
and identify issues, gaps, and areas for improvement: missing meals, overcrowded schedules, \
poor sequencing, weather mismatches, missing attractions, lack of variety, missing practical \
information, unrealistic pacing, missing rest time, and missing cultural experiences. \
Provide specific, actionable feedback.";

/// Marker the prompts ask the model to end with.
const TERMINATE: &str = "TERMINATE";

const MAX_TEMPERATURE_CHARS: usize = 20;
const MAX_ACTIVITY_CHARS: usize = 30;

static TEMPERATURE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Temperature:[ \t]*([^\n]*)").expect("Invalid regex"));

/// Itinerary tools.
#[derive(Clone)]
pub struct ItineraryTools {
    model: Arc<dyn LanguageModel>,
}

impl ItineraryTools {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Draft a day-by-day itinerary.
    ///
    /// Only the temperature from `weather_report` and the first activity from
    /// `activity_report` go into the prompt, which keeps local models fast.
    ///
    /// # Errors
    /// Propagates model errors; a reply that is empty once the termination
    /// marker is removed is `ApiError::EmptyResponse`.
    pub async fn create_itinerary(
        &self,
        destination: &str,
        days: u32,
        activity_report: &str,
        weather_report: &str,
    ) -> ApiResult<String> {
        let prompt = itinerary_prompt(destination, days, activity_report, weather_report);
        tracing::debug!(destination, days, "Drafting itinerary");

        let reply = self.model.complete(PLANNER_SYSTEM, &prompt).await?;
        non_empty(strip_terminate(&reply), "itinerary")
    }

    /// Ask the model to review an itinerary.
    pub async fn critique_itinerary(
        &self,
        itinerary: &str,
        destination: &str,
        days: u32,
        weather_report: &str,
    ) -> ApiResult<String> {
        let mut prompt = format!(
            "Review this {}-day itinerary for {}:\n\n{}\n",
            days, destination, itinerary
        );
        if !weather_report.is_empty() {
            prompt.push_str(&format!("\nWeather Information:\n{}\n", weather_report));
        }
        prompt.push_str(
            "\nIdentify missing meals, overcrowded or unrealistic schedules, poor sequencing, \
weather-inappropriate activities, missing attractions, lack of variety, missing practical \
information, and missing rest time. Provide a constructive critique with specific \
recommendations. End with TERMINATE.",
        );

        let reply = self.model.complete(CRITIC_SYSTEM, &prompt).await?;
        non_empty(strip_terminate(&reply), "critique")
    }

    /// Rewrite an itinerary so it addresses a critique.
    pub async fn refine_itinerary(
        &self,
        itinerary: &str,
        critique: &str,
        destination: &str,
        days: u32,
    ) -> ApiResult<String> {
        let prompt = format!(
            "Original {days}-day itinerary for {destination}:\n\n{itinerary}\n\n\
Critique and feedback:\n{critique}\n\n\
Now create an improved, refined version of this itinerary that addresses ALL concerns raised \
in the critique. Include every meal, realistic pacing with rest breaks, practical transport \
and booking tips, and local cultural experiences. Keep a friendly narrative style, formatted \
with Day X sections and Morning/Afternoon/Evening.\n\nEnd with TERMINATE."
        );

        let reply = self.model.complete(PLANNER_SYSTEM, &prompt).await?;
        non_empty(strip_terminate(&reply), "refinement")
    }
}

/// Build the compact drafting prompt.
pub fn itinerary_prompt(destination: &str, days: u32, activity_report: &str, weather_report: &str) -> String {
    let mut prompt = format!("Create {}-day itinerary for {}.", days, destination);

    if let Some(temperature) = extract_temperature(weather_report) {
        prompt.push_str(&format!(" Weather: {}", temperature));
    }
    if let Some(activity) = first_activity(activity_report) {
        prompt.push_str(&format!(" Activities: {}...", activity));
    }

    prompt.push_str(" Format: Day X - Morning/Afternoon/Evening. Include meals. TERMINATE.");
    prompt
}

fn extract_temperature(weather_report: &str) -> Option<String> {
    let value = TEMPERATURE_LINE.captures(weather_report)?.get(1)?.as_str().trim();
    let value: String = value.chars().take(MAX_TEMPERATURE_CHARS).collect();
    (!value.is_empty()).then_some(value)
}

/// Name of the first bulleted activity (`• Name - description`).
fn first_activity(activity_report: &str) -> Option<String> {
    let (_, rest) = activity_report.split_once('•')?;
    let line = rest.lines().next().unwrap_or("");
    let name = line.split(" - ").next().unwrap_or("").trim();
    let name: String = name.chars().take(MAX_ACTIVITY_CHARS).collect();
    (!name.is_empty()).then_some(name)
}

/// Trim the reply and drop a trailing termination marker.
pub fn strip_terminate(reply: &str) -> String {
    let reply = reply.trim_end();
    reply
        .strip_suffix(TERMINATE)
        .unwrap_or(reply)
        .trim()
        .to_string()
}

fn non_empty(text: String, what: &str) -> ApiResult<String> {
    if text.is_empty() {
        Err(ApiError::EmptyResponse(what.to_string()))
    } else {
        Ok(text)
    }
}

impl std::fmt::Debug for ItineraryTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItineraryTools").finish_non_exhaustive()
    }
}
