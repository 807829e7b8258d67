//! Device location resolution. Runs once per session; failures are never retried.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

use crate::{
    config::{Config, GeolocationConfig},
    model::Coordinates,
};

pub const IP_API_URL: &str = "http://ip-api.com/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("geolocation denied: {0}")]
    Denied(String),
    #[error("geolocation is not supported in this configuration")]
    Unsupported,
    #[error("geolocation lookup failed: {0}")]
    Lookup(String),
}

#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Coordinates taken from configuration.
#[derive(Debug, Clone)]
pub struct FixedLocation(pub Option<Coordinates>);

#[async_trait]
impl LocationResolver for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.0.ok_or(LocationError::Unsupported)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DisabledLocation;

#[async_trait]
impl LocationResolver for DisabledLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Approximate position from the public IP address (ip-api.com).
#[derive(Debug, Clone)]
pub struct IpLocation {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpLocation {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for IP geolocation")?;

        Ok(Self { url: url.to_string(), http })
    }
}

#[async_trait]
impl LocationResolver for IpLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Lookup(e.to_string()))?;

        if !res.status().is_success() {
            return Err(LocationError::Lookup(format!("status {}", res.status())));
        }

        let body: IpApiResponse =
            res.json().await.map_err(|e| LocationError::Lookup(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            return Err(LocationError::Denied(reason));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => {
                tracing::info!(
                    latitude,
                    longitude,
                    city = body.city.as_deref().unwrap_or("?"),
                    "resolved location from IP"
                );
                Ok(Coordinates { latitude, longitude })
            }
            _ => Err(LocationError::Lookup("response carried no coordinates".into())),
        }
    }
}

pub fn resolver_from_config(config: &Config) -> anyhow::Result<Box<dyn LocationResolver>> {
    let boxed: Box<dyn LocationResolver> = match &config.geolocation {
        GeolocationConfig::Ip { url } => match url {
            Some(url) => Box::new(IpLocation::with_url(url)?),
            None => Box::new(IpLocation::new()?),
        },
        GeolocationConfig::Fixed { latitude, longitude } => {
            Box::new(FixedLocation(Some(Coordinates { latitude: *latitude, longitude: *longitude })))
        }
        GeolocationConfig::Disabled => Box::new(DisabledLocation),
    };

    Ok(boxed)
}
