use crate::model::{AirQualityReading, CitySuggestion, CurrentWeather, ForecastSeries, Location};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod backend;

pub use backend::BackendClient;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, unreadable body.
    #[error("Request to weather backend failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-200 status code.
    #[error("Weather backend returned status {code}: {message}")]
    Upstream { code: u16, message: String },

    /// The body was not the expected JSON shape.
    #[error("Failed to parse {what}: {reason}")]
    Parse { what: &'static str, reason: String },
}

impl ClientError {
    pub(crate) fn parse(what: &'static str, reason: impl ToString) -> Self {
        ClientError::Parse { what, reason: reason.to_string() }
    }
}

/// Read-only access to the weather proxy.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Current weather for a city name. Fails with [`ClientError::Upstream`]
    /// when the response status is not 200.
    async fn fetch_current_by_city(&self, city: &str) -> Result<CurrentWeather, ClientError>;

    /// Current weather for a position. The status field is not inspected.
    async fn fetch_current_by_coords(
        &self,
        location: Location,
    ) -> Result<CurrentWeather, ClientError>;

    /// 3-hourly forecast; `None` when the response carries no forecast list.
    async fn fetch_forecast(
        &self,
        location: Location,
    ) -> Result<Option<ForecastSeries>, ClientError>;

    async fn fetch_air_quality(
        &self,
        location: Location,
    ) -> Result<AirQualityReading, ClientError>;

    /// City names starting with `prefix`.
    async fn suggest_cities(&self, prefix: &str) -> Result<Vec<CitySuggestion>, ClientError>;
}
