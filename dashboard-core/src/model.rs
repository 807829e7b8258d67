use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Device or configured position, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Temperature scale used both for display and for the `units` request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Celsius,
    Fahrenheit,
}

impl UnitSystem {
    pub fn toggle(self) -> Self {
        match self {
            UnitSystem::Celsius => UnitSystem::Fahrenheit,
            UnitSystem::Fahrenheit => UnitSystem::Celsius,
        }
    }

    /// Provider unit code: metric (`M`) or imperial (`I`).
    pub fn api_code(self) -> &'static str {
        match self {
            UnitSystem::Celsius => "M",
            UnitSystem::Fahrenheit => "I",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnitSystem::Celsius => "C",
            UnitSystem::Fahrenheit => "F",
        }
    }

    pub fn wind_unit(self) -> &'static str {
        match self {
            UnitSystem::Celsius => "m/s",
            UnitSystem::Fahrenheit => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Celsius => f.write_str("Celsius"),
            UnitSystem::Fahrenheit => f.write_str("Fahrenheit"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(UnitSystem::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(UnitSystem::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: celsius, fahrenheit."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn toggle(self) -> Self {
        match self {
            TimeFormat::TwelveHour => TimeFormat::TwentyFourHour,
            TimeFormat::TwentyFourHour => TimeFormat::TwelveHour,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "12-Hour Time",
            TimeFormat::TwentyFourHour => "24-Hour Time",
        }
    }
}

impl FromStr for TimeFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "12" | "12h" => Ok(TimeFormat::TwelveHour),
            "24" | "24h" => Ok(TimeFormat::TwentyFourHour),
            _ => Err(anyhow::anyhow!("Unknown time format '{value}'. Supported: 12h, 24h.")),
        }
    }
}

/// Normalized result of one current-conditions call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    /// As returned by the provider, in `units`.
    pub temperature_raw: f64,
    pub wind_speed: f64,
    /// `HH:MM`, 24-hour, provider timezone.
    pub sunrise: String,
    pub sunset: String,
    pub condition_description: String,
    /// Unit system the request was issued with.
    pub units: UnitSystem,
    pub observed_at: Option<NaiveDateTime>,
}

/// One of the two weather panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    CurrentLocation,
    SearchedLocation,
}

impl Target {
    pub fn title(self) -> &'static str {
        match self {
            Target::CurrentLocation => "Current Location Weather",
            Target::SearchedLocation => "Searched Location Weather",
        }
    }

    pub(crate) fn log_name(self) -> &'static str {
        match self {
            Target::CurrentLocation => "current",
            Target::SearchedLocation => "searched",
        }
    }
}
