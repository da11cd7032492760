//! Market weather labels attached to historical events

use crate::error::{RdiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weather state describing the character of a downturn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherState {
    Clear,
    Cloudy,
    Shower,
    Storm,
    Typhoon,
}

impl WeatherState {
    pub const ALL: [WeatherState; 5] = [
        WeatherState::Clear,
        WeatherState::Cloudy,
        WeatherState::Shower,
        WeatherState::Storm,
        WeatherState::Typhoon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherState::Clear => "clear",
            WeatherState::Cloudy => "cloudy",
            WeatherState::Shower => "shower",
            WeatherState::Storm => "storm",
            WeatherState::Typhoon => "typhoon",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WeatherState::Clear => "☀",
            WeatherState::Cloudy => "☁",
            WeatherState::Shower => "🌦",
            WeatherState::Storm => "⛈",
            WeatherState::Typhoon => "🌪",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherState::Clear => "No material drawdown; recovery risk is negligible",
            WeatherState::Cloudy => "Mild drawdown with a short, orderly recovery",
            WeatherState::Shower => "Sharp but brief shock; recovery normalizes quickly",
            WeatherState::Storm => "Broad stress with a prolonged recovery",
            WeatherState::Typhoon => "Systemic breakdown; recovery stays depressed for a long time",
        }
    }

    /// Badge style class consumed by presentation layers
    pub fn style_class(&self) -> &'static str {
        match self {
            WeatherState::Clear => "badge-clear",
            WeatherState::Cloudy => "badge-cloudy",
            WeatherState::Shower => "badge-shower",
            WeatherState::Storm => "badge-storm",
            WeatherState::Typhoon => "badge-typhoon",
        }
    }
}

impl fmt::Display for WeatherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.as_str())
    }
}

impl FromStr for WeatherState {
    type Err = RdiError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_ascii_lowercase();
        WeatherState::ALL
            .into_iter()
            .find(|w| w.as_str() == label)
            .ok_or_else(|| RdiError::UnknownWeather {
                label: s.to_string(),
            })
    }
}
