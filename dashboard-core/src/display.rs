//! Derived display values: temperatures, wind and sunrise/sunset times.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::model::{TimeFormat, UnitSystem, WeatherRecord};

/// How a raw provider temperature becomes the displayed number.
///
/// `LegacyFahrenheitToCelsius` keys the conversion on the display unit alone:
/// Celsius always applies `(t - 32) * 5/9`, Fahrenheit shows the raw value.
/// It is only correct when the provider was asked for imperial units, and is
/// kept selectable so the historical numbers can be reproduced.
///
/// `AsRequested` converts from the unit the record was requested in to the
/// display unit, which is the identity when the two agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureConversion {
    #[default]
    AsRequested,
    #[serde(rename = "legacy")]
    LegacyFahrenheitToCelsius,
}

pub fn fahrenheit_to_celsius(value: f64) -> f64 {
    (value - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(value: f64) -> f64 {
    value * 9.0 / 5.0 + 32.0
}

pub fn display_temperature(
    record: &WeatherRecord,
    display: UnitSystem,
    policy: TemperatureConversion,
) -> f64 {
    let raw = record.temperature_raw;

    match policy {
        TemperatureConversion::LegacyFahrenheitToCelsius => match display {
            UnitSystem::Celsius => fahrenheit_to_celsius(raw),
            UnitSystem::Fahrenheit => raw,
        },
        TemperatureConversion::AsRequested => match (record.units, display) {
            (UnitSystem::Celsius, UnitSystem::Fahrenheit) => celsius_to_fahrenheit(raw),
            (UnitSystem::Fahrenheit, UnitSystem::Celsius) => fahrenheit_to_celsius(raw),
            _ => raw,
        },
    }
}

pub fn format_temperature(value: f64, unit: UnitSystem) -> String {
    format!("{value:.1} °{}", unit.symbol())
}

/// Wind speed is shown in whatever unit the record was requested with.
pub fn format_wind(record: &WeatherRecord) -> String {
    format!("{:.1} {}", record.wind_speed, record.units.wind_unit())
}

/// Render a provider `HH:MM` time. No timezone conversion is applied.
///
/// Input that does not parse as `HH:MM` is returned unchanged.
pub fn format_time(raw: &str, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwentyFourHour => raw.to_string(),
        TimeFormat::TwelveHour => {
            let Ok(time) = NaiveTime::parse_from_str(raw.trim(), "%H:%M") else {
                tracing::debug!(raw, "unparseable time left as-is");
                return raw.to_string();
            };

            let (is_pm, hour) = time.hour12();
            let period = if is_pm { "PM" } else { "AM" };
            format!("{hour}:{:02} {period}", time.minute())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(temp: f64, units: UnitSystem) -> WeatherRecord {
        WeatherRecord {
            city_name: "Raleigh".into(),
            temperature_raw: temp,
            wind_speed: 3.3,
            sunrise: "06:12".into(),
            sunset: "20:31".into(),
            condition_description: "Few clouds".into(),
            units,
            observed_at: None,
        }
    }

    #[test]
    fn twelve_hour_formatting() {
        assert_eq!(format_time("00:15", TimeFormat::TwelveHour), "12:15 AM");
        assert_eq!(format_time("13:05", TimeFormat::TwelveHour), "1:05 PM");
        assert_eq!(format_time("12:00", TimeFormat::TwelveHour), "12:00 PM");
        assert_eq!(format_time("06:45", TimeFormat::TwelveHour), "6:45 AM");
    }

    #[test]
    fn twenty_four_hour_is_unchanged() {
        assert_eq!(format_time("13:05", TimeFormat::TwentyFourHour), "13:05");
        assert_eq!(format_time("00:15", TimeFormat::TwentyFourHour), "00:15");
    }

    #[test]
    fn malformed_time_is_passed_through() {
        assert_eq!(format_time("sunrise", TimeFormat::TwelveHour), "sunrise");
        assert_eq!(format_time("25:61", TimeFormat::TwelveHour), "25:61");
    }

    #[test]
    fn legacy_policy_converts_on_display_flag_only() {
        let imperial = record(68.0, UnitSystem::Fahrenheit);
        let legacy = TemperatureConversion::LegacyFahrenheitToCelsius;

        assert_eq!(display_temperature(&imperial, UnitSystem::Celsius, legacy), 20.0);
        assert_eq!(display_temperature(&imperial, UnitSystem::Fahrenheit, legacy), 68.0);

        // A metric response is converted again, which is the known defect.
        let metric = record(20.0, UnitSystem::Celsius);
        let shown = display_temperature(&metric, UnitSystem::Celsius, legacy);
        assert!((shown - (-6.666_666)).abs() < 1e-3);
    }

    #[test]
    fn as_requested_policy_is_identity_when_units_match() {
        let policy = TemperatureConversion::AsRequested;

        let metric = record(20.0, UnitSystem::Celsius);
        assert_eq!(display_temperature(&metric, UnitSystem::Celsius, policy), 20.0);

        let imperial = record(68.0, UnitSystem::Fahrenheit);
        assert_eq!(display_temperature(&imperial, UnitSystem::Fahrenheit, policy), 68.0);
    }

    #[test]
    fn as_requested_policy_converts_mismatched_records() {
        let policy = TemperatureConversion::AsRequested;

        let metric = record(100.0, UnitSystem::Celsius);
        assert_eq!(display_temperature(&metric, UnitSystem::Fahrenheit, policy), 212.0);

        let imperial = record(212.0, UnitSystem::Fahrenheit);
        assert_eq!(display_temperature(&imperial, UnitSystem::Celsius, policy), 100.0);
    }

    #[test]
    fn formats_temperature_and_wind() {
        assert_eq!(format_temperature(21.456, UnitSystem::Celsius), "21.5 °C");
        assert_eq!(format_wind(&record(0.0, UnitSystem::Fahrenheit)), "3.3 mph");
    }
}
