//! Weather lookup for trip destinations.
//!
//! Known cities come from a static table; anything else is filled in by a
//! [`WeatherFallback`] provider.

use crate::cache::normalize_text;
use crate::models::{WeatherCondition, WeatherReport, WeatherSample};
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

static CITY_WEATHER: Lazy<HashMap<&'static str, WeatherSample>> = Lazy::new(|| {
    use WeatherCondition::*;
    HashMap::from([
        ("paris", WeatherSample::new(18, PartlyCloudy, 65, 10)),
        ("tokyo", WeatherSample::new(22, Sunny, 70, 8)),
        ("new york", WeatherSample::new(15, Cloudy, 60, 12)),
        ("london", WeatherSample::new(12, Rainy, 80, 15)),
        ("dubai", WeatherSample::new(35, Sunny, 45, 5)),
        ("barcelona", WeatherSample::new(20, Sunny, 55, 10)),
        ("rome", WeatherSample::new(19, PartlyCloudy, 65, 8)),
        ("sydney", WeatherSample::new(24, Sunny, 68, 12)),
        ("bangkok", WeatherSample::new(32, PartlyCloudy, 75, 6)),
        ("singapore", WeatherSample::new(30, PartlyCloudy, 80, 8)),
    ])
});

/// Source of weather for destinations missing from the city table.
pub trait WeatherFallback: Send + Sync + std::fmt::Debug {
    fn sample(&self, destination: &str) -> WeatherSample;
}

/// Plausible random weather.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomWeather;

impl WeatherFallback for RandomWeather {
    fn sample(&self, _destination: &str) -> WeatherSample {
        let mut rng = rand::rng();
        let condition = WeatherCondition::ALL
            .choose(&mut rng)
            .copied()
            .unwrap_or(WeatherCondition::Sunny);

        WeatherSample::new(
            rng.random_range(15..=28),
            condition,
            rng.random_range(50..=80),
            rng.random_range(5..=15),
        )
    }
}

/// Always returns the same sample.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub WeatherSample);

impl WeatherFallback for FixedWeather {
    fn sample(&self, _destination: &str) -> WeatherSample {
        self.0
    }
}

/// Weather tools.
#[derive(Debug, Clone)]
pub struct WeatherTools {
    fallback: Arc<dyn WeatherFallback>,
}

impl Default for WeatherTools {
    fn default() -> Self {
        Self::new(Arc::new(RandomWeather))
    }
}

impl WeatherTools {
    pub fn new(fallback: Arc<dyn WeatherFallback>) -> Self {
        Self { fallback }
    }

    /// Weather for `destination` on `date` (today when `None`).
    ///
    /// The destination is echoed back as given; lookup is case- and
    /// whitespace-insensitive.
    pub fn get_weather(&self, destination: &str, date: Option<NaiveDate>) -> WeatherReport {
        let key = normalize_text(destination);
        let (sample, from_table) = match CITY_WEATHER.get(key.as_str()) {
            Some(sample) => (*sample, true),
            None => {
                tracing::debug!(destination, "No table weather, using fallback");
                (self.fallback.sample(destination), false)
            }
        };

        let date = date.unwrap_or_else(|| Local::now().date_naive());

        WeatherReport {
            destination: destination.to_string(),
            temperature_c: sample.temp_c,
            condition: sample.condition,
            humidity_pct: sample.humidity_pct,
            wind_kmh: sample.wind_kmh,
            date: date.format("%Y-%m-%d").to_string(),
            recommendation: recommendation(sample.condition, sample.temp_c).to_string(),
            from_table,
        }
    }
}

/// Activity/packing hint for the given conditions. First matching rule wins.
pub fn recommendation(condition: WeatherCondition, temp_c: i32) -> &'static str {
    match condition {
        WeatherCondition::Rainy => {
            "Indoor activities recommended. Pack an umbrella and waterproof gear."
        }
        WeatherCondition::Sunny if temp_c > 25 => {
            "Perfect for outdoor activities! Wear light clothing and use sunscreen."
        }
        _ if temp_c < 10 => {
            "Cold weather expected. Dress warmly and consider indoor attractions."
        }
        WeatherCondition::Cloudy => {
            "Mild weather conditions. Good for both indoor and outdoor activities."
        }
        _ => "Pleasant weather conditions ideal for sightseeing and outdoor exploration.",
    }
}
