use serde::{Deserialize, Serialize};
use std::fmt;

/// Sky conditions the weather tool can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Sunny,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Cloudy,
    Rainy,
}

impl WeatherCondition {
    /// Every condition, in table order.
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Sunny,
        WeatherCondition::PartlyCloudy,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw observation for one place, before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub temp_c: i32,
    pub condition: WeatherCondition,
    pub humidity_pct: u8,
    pub wind_kmh: u32,
}

impl WeatherSample {
    pub const fn new(temp_c: i32, condition: WeatherCondition, humidity_pct: u8, wind_kmh: u32) -> Self {
        Self {
            temp_c,
            condition,
            humidity_pct,
            wind_kmh,
        }
    }
}

/// Weather for a destination on a given date, with a packing/activity hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub destination: String,
    pub temperature_c: i32,
    pub condition: WeatherCondition,
    pub humidity_pct: u8,
    pub wind_kmh: u32,

    /// ISO date (YYYY-MM-DD)
    pub date: String,

    pub recommendation: String,

    /// False when the numbers came from the fallback provider
    #[serde(default)]
    pub from_table: bool,
}

impl WeatherReport {
    /// Multi-line text handed to the itinerary prompt and shown to users.
    pub fn report_text(&self) -> String {
        format!(
            "Weather in {}:\nTemperature: {}°C\nCondition: {}\nHumidity: {}%\nWind Speed: {} km/h\n\nRecommendation: {}",
            self.destination,
            self.temperature_c,
            self.condition,
            self.humidity_pct,
            self.wind_kmh,
            self.recommendation
        )
    }
}
