use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    model::{
        AirQualityReading, CitySuggestion, CurrentWeather, ForecastPoint, ForecastSeries,
        Location,
    },
};

use super::{ClientError, WeatherClient};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the weather proxy (`/weather`, `/forecast`, `/aqi`, `/cities`).
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::with_timeout(&config.backend_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}{path}` and decode the body as JSON, whatever the HTTP status.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<(StatusCode, Value), ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "Requesting {what}");

        let res = self.http.get(&url).query(query).send().await?;
        let status = res.status();
        let body = res.text().await?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok((status, value)),
            Err(_) if !status.is_success() => Err(ClientError::Upstream {
                code: status.as_u16(),
                message: truncate_body(&body),
            }),
            Err(e) => Err(ClientError::parse(what, e)),
        }
    }

    async fn fetch_current(&self, query: &[(&str, String)]) -> Result<Value, ClientError> {
        let (_, value) = self.get_json("/weather", query, "current weather").await?;
        Ok(value)
    }
}

fn coords_query(location: Location) -> [(&'static str, String); 2] {
    [
        ("lat", location.latitude.to_string()),
        ("lon", location.longitude.to_string()),
    ]
}

/// Reject HTTP errors for endpoints that carry no status field of their own.
fn ensure_success(status: StatusCode, value: &Value) -> Result<(), ClientError> {
    if status.is_success() {
        return Ok(());
    }
    Err(ClientError::Upstream {
        code: status.as_u16(),
        message: upstream_message(value),
    })
}

/// The `cod` field: a number for successes, often a numeric string for errors.
fn status_code(value: &Value) -> Option<u16> {
    match value.get("cod")? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn upstream_message(value: &Value) -> String {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| truncate_body(&value.to_string()))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
    coord: OwCoord,
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon_id) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        CurrentWeather {
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            description,
            icon_id,
            place_name: parsed.name,
            country_code: parsed.sys.country,
            location: Location::new(parsed.coord.lat, parsed.coord.lon),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwTemp {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwIcon {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwTemp,
    weather: Vec<OwIcon>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Option<Vec<OwForecastEntry>>,
}

impl From<OwForecastEntry> for ForecastPoint {
    fn from(entry: OwForecastEntry) -> Self {
        ForecastPoint {
            timestamp: entry.dt,
            temperature_c: entry.main.temp,
            icon_id: entry.weather.into_iter().next().map(|w| w.icon).unwrap_or_default(),
            text_timestamp: entry.dt_txt,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct OwComponents {
    pm2_5: f64,
    pm10: f64,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAqi,
    components: OwComponents,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

fn parse_current(value: Value) -> Result<CurrentWeather, ClientError> {
    let parsed: OwCurrentResponse =
        serde_json::from_value(value).map_err(|e| ClientError::parse("current weather", e))?;
    Ok(parsed.into())
}

fn parse_forecast(value: Value) -> Result<Option<ForecastSeries>, ClientError> {
    if value.get("list").is_none_or(Value::is_null) {
        return Ok(None);
    }
    let parsed: OwForecastResponse =
        serde_json::from_value(value).map_err(|e| ClientError::parse("forecast", e))?;

    Ok(parsed
        .list
        .map(|list| ForecastSeries::new(list.into_iter().map(ForecastPoint::from).collect())))
}

fn parse_air_quality(value: Value) -> Result<AirQualityReading, ClientError> {
    let parsed: OwAirResponse =
        serde_json::from_value(value).map_err(|e| ClientError::parse("air quality", e))?;

    let entry = parsed
        .list
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::parse("air quality", "response contained no readings"))?;

    Ok(AirQualityReading {
        index: entry.main.aqi,
        pm2_5: entry.components.pm2_5,
        pm10: entry.components.pm10,
    })
}

fn parse_cities(value: Value) -> Result<Vec<CitySuggestion>, ClientError> {
    let parsed: Vec<OwCity> =
        serde_json::from_value(value).map_err(|e| ClientError::parse("city suggestions", e))?;

    Ok(parsed
        .into_iter()
        .map(|c| CitySuggestion { name: c.name, country: c.country })
        .collect())
}

#[async_trait]
impl WeatherClient for BackendClient {
    #[instrument(skip(self))]
    async fn fetch_current_by_city(&self, city: &str) -> Result<CurrentWeather, ClientError> {
        let value = self.fetch_current(&[("city", city.to_owned())]).await?;

        match status_code(&value) {
            Some(200) => parse_current(value),
            code => Err(ClientError::Upstream {
                code: code.unwrap_or(0),
                message: upstream_message(&value),
            }),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_current_by_coords(
        &self,
        location: Location,
    ) -> Result<CurrentWeather, ClientError> {
        let value = self.fetch_current(&coords_query(location)).await?;
        parse_current(value)
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(
        &self,
        location: Location,
    ) -> Result<Option<ForecastSeries>, ClientError> {
        let (_, value) = self.get_json("/forecast", &coords_query(location), "forecast").await?;
        parse_forecast(value)
    }

    #[instrument(skip(self))]
    async fn fetch_air_quality(
        &self,
        location: Location,
    ) -> Result<AirQualityReading, ClientError> {
        let (status, value) = self.get_json("/aqi", &coords_query(location), "air quality").await?;
        ensure_success(status, &value)?;
        parse_air_quality(value)
    }

    #[instrument(skip(self))]
    async fn suggest_cities(&self, prefix: &str) -> Result<Vec<CitySuggestion>, ClientError> {
        let (status, value) = self
            .get_json("/cities", &[("q", prefix.to_owned())], "city suggestions")
            .await?;
        ensure_success(status, &value)?;
        parse_cities(value)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
