pub mod activity;
pub mod plan;
pub mod weather;

pub use activity::{Activity, ActivitySearch, SearchHit, SearchOutcome};
pub use plan::{ActivitySection, ItinerarySection, ProcessSummary, TripPlan, WeatherSection};
pub use weather::{WeatherCondition, WeatherReport, WeatherSample};
