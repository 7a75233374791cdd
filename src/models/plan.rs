use super::activity::ActivitySearch;
use super::weather::WeatherReport;
use serde::{Deserialize, Serialize};

/// A complete trip plan, as cached and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub destination: String,
    pub duration: u32,
    pub weather: WeatherSection,
    pub activities: ActivitySection,
    pub itinerary: ItinerarySection,
    pub process: ProcessSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSection {
    pub report: String,
    pub raw: WeatherReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySection {
    pub research: String,
    pub data: ActivitySearch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItinerarySection {
    pub initial: String,

    #[serde(rename = "final")]
    pub final_itinerary: String,

    /// Empty when the critique stage is disabled or failed
    #[serde(default)]
    pub critique: String,
}

/// Which steps ran and whether each succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub steps_completed: u8,
    pub weather_success: bool,
    pub activity_success: bool,
    pub itinerary_success: bool,
    pub critique_success: bool,
}
