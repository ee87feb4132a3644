use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Geographic position, either geocoded by the backend or reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Current conditions for one place. Fetched fresh per query, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub icon_id: String,
    pub place_name: String,
    pub country_code: String,
    pub location: Location,
}

impl CurrentWeather {
    /// "Paris, FR"
    pub fn place_label(&self) -> String {
        format!("{}, {}", self.place_name, self.country_code)
    }
}

/// One 3-hour step of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Unix seconds.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub icon_id: String,
    /// Server-formatted local time, e.g. "2024-01-01 12:00:00".
    pub text_timestamp: String,
}

impl ForecastPoint {
    /// Local wall-clock time of the point, or `None` for an out-of-range timestamp.
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        DateTime::from_timestamp(self.timestamp, 0).map(|utc| utc.with_timezone(&Local))
    }

    /// Short weekday ("Mon") of the text timestamp, falling back to the unix timestamp.
    pub fn weekday_short(&self) -> String {
        match NaiveDateTime::parse_from_str(&self.text_timestamp, "%Y-%m-%d %H:%M:%S") {
            Ok(ndt) => ndt.format("%a").to_string(),
            Err(_) => self
                .local_time()
                .map(|t| t.format("%a").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Number of points drawn on the temperature chart (next ~24h).
pub const CHART_POINTS: usize = 8;

/// Substring marking the noon entry of each day in the text timestamp.
const NOON_MARKER: &str = "12:00";

/// Ordered forecast points as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Self {
        Self { points }
    }

    /// The first [`CHART_POINTS`] points, in order.
    pub fn chart_points(&self) -> &[ForecastPoint] {
        let end = self.points.len().min(CHART_POINTS);
        &self.points[..end]
    }

    /// Points whose text timestamp contains "12:00", in their original order.
    ///
    /// This is a textual match on the server's formatting, not a parsed hour.
    pub fn daily_points(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points
            .iter()
            .filter(|p| p.text_timestamp.contains(NOON_MARKER))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// 1 (good) to 5 (very poor); anything else cannot be described.
    pub index: i64,
    pub pm2_5: f64,
    pub pm10: f64,
}

/// One autocomplete row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
}

impl std::fmt::Display for CitySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}
