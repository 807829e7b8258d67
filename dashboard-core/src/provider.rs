use crate::{Config, RequestParams, WeatherRecord, provider::weatherbit::WeatherbitProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherbit;

/// Why a current-conditions fetch produced no record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider returned status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("could not decode provider response: {0}")]
    Decode(String),
    #[error("no location matched the query")]
    EmptyResult,
}

impl FetchError {
    /// Short label for panel rendering.
    pub fn summary(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network error",
            FetchError::Http { .. } => "provider error",
            FetchError::Decode(_) => "unreadable response",
            FetchError::EmptyResult => "no matching location",
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, params: &RequestParams) -> Result<WeatherRecord, FetchError>;
}

/// Construct the provider from config, honoring a custom base URL.
pub fn provider_from_config(config: &Config) -> anyhow::Result<WeatherbitProvider> {
    match config.base_url.as_deref() {
        Some(url) => WeatherbitProvider::with_base_url(url),
        None => WeatherbitProvider::new(),
    }
}
