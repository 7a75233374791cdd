//! Trip planning tools.
//!
//! - **Weather**: static city table with a pluggable fallback
//! - **Search**: cached web and activity search with curated fallbacks
//! - **Itinerary**: model-backed drafting, critique, and refinement

pub mod itinerary;
pub mod search;
pub mod weather;

pub use itinerary::ItineraryTools;
pub use search::SearchTools;
pub use weather::{FixedWeather, RandomWeather, WeatherFallback, WeatherTools};
