use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    model::WeatherRecord,
    query::{LocationQuery, RequestParams},
};

use super::{FetchError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherbit.io/v2.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WeatherbitProvider {
    base_url: String,
    http: Client,
}

impl WeatherbitProvider {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for Weatherbit")?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct WbCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WbObservation {
    city_name: String,
    temp: f64,
    wind_spd: f64,
    sunrise: String,
    sunset: String,
    weather: WbCondition,
    ob_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WbCurrentResponse {
    #[serde(default)]
    data: Vec<WbObservation>,
}

#[async_trait]
impl WeatherProvider for WeatherbitProvider {
    async fn current(&self, params: &RequestParams) -> Result<WeatherRecord, FetchError> {
        let url = format!("{}/current", self.base_url);
        let selector = selector_name(&params.location);

        tracing::debug!(selector, units = params.units.api_code(), "requesting current conditions");

        let res = self
            .http
            .get(&url)
            .query(&params.query_pairs())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::Network(e.to_string()))?;

        // Weatherbit answers an unmatched location with 204 and no body.
        if status == StatusCode::NO_CONTENT || (status.is_success() && body.trim().is_empty()) {
            return Err(FetchError::EmptyResult);
        }

        if !status.is_success() {
            return Err(FetchError::Http { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: WbCurrentResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        let first = parsed.data.into_iter().next().ok_or(FetchError::EmptyResult)?;

        Ok(WeatherRecord {
            city_name: first.city_name,
            temperature_raw: first.temp,
            wind_speed: first.wind_spd,
            sunrise: first.sunrise,
            sunset: first.sunset,
            condition_description: first.weather.description,
            units: params.units,
            observed_at: first.ob_time.as_deref().and_then(parse_ob_time),
        })
    }
}

fn selector_name(location: &LocationQuery) -> &'static str {
    match location {
        LocationQuery::Coordinates(_) => "coordinates",
        LocationQuery::PostalCode(_) => "postal_code",
        LocationQuery::City(_) => "city",
    }
}

fn parse_ob_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").ok()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
