//! Rendering of fetched data onto display regions, a map widget and a chart widget.
//!
//! The widgets are injected once through [`Presenter::new`]; the presenter keeps the
//! map and chart state between renders.

use tracing::debug;

use crate::{
    advisory::{AdvisoryError, aqi_descriptor, comfort_text},
    config::Config,
    model::{AirQualityReading, CitySuggestion, CurrentWeather, ForecastSeries, Location},
};

/// Named text regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Temperature,
    FeelsLike,
    Description,
    Place,
    Advisory,
    AqiLabel,
    Particulates,
    HealthAdvice,
}

/// One day of the noon-based daily view.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCard {
    pub weekday: String,
    pub icon_url: String,
    pub temperature: String,
}

/// Display regions and user interaction points.
pub trait Surface: Send {
    fn set_text(&mut self, region: Region, text: &str);
    fn set_icon(&mut self, url: &str);
    fn set_aqi_bar(&mut self, width_percent: u8, color: &str);
    fn show_aqi_panel(&mut self);
    fn set_daily_cards(&mut self, cards: &[DailyCard]);
    /// Replace the suggestion rows; an empty slice clears them.
    fn set_suggestions(&mut self, rows: &[CitySuggestion]);
    fn city_input(&self) -> String;
    fn set_city_input(&mut self, value: &str);
    fn alert(&mut self, message: &str);
}

/// Slippy map with one marker.
pub trait MapWidget: Send {
    fn open(&mut self, center: Location, zoom: u8);
    fn add_tile_layer(&mut self, url_template: &str);
    fn add_marker(&mut self, at: Location);
    fn set_view(&mut self, center: Location, zoom: u8);
    fn move_marker(&mut self, to: Location);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartHandle(pub u64);

/// A single-series line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub series_label: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub line_color: &'static str,
    pub fill_color: &'static str,
}

pub trait ChartWidget: Send {
    fn draw(&mut self, spec: &ChartSpec) -> ChartHandle;
    fn destroy(&mut self, handle: ChartHandle);
}

/// Presentation constants taken from [`Config`].
#[derive(Debug, Clone)]
pub struct PresenterSettings {
    pub map_zoom: u8,
    pub tile_url: String,
    pub icon_base_url: String,
}

impl From<&Config> for PresenterSettings {
    fn from(config: &Config) -> Self {
        Self {
            map_zoom: config.map_zoom,
            tile_url: config.tile_url.clone(),
            icon_base_url: config.icon_base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, Default)]
struct UiState {
    map_open: bool,
    chart: Option<ChartHandle>,
}

pub struct Presenter {
    surface: Box<dyn Surface>,
    map: Box<dyn MapWidget>,
    chart: Box<dyn ChartWidget>,
    settings: PresenterSettings,
    state: UiState,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// `Math.round` semantics: halves round towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn degrees(value: f64) -> String {
    format!("{}°C", round_half_up(value))
}

impl Presenter {
    pub fn new(
        surface: Box<dyn Surface>,
        map: Box<dyn MapWidget>,
        chart: Box<dyn ChartWidget>,
        settings: PresenterSettings,
    ) -> Self {
        Self { surface, map, chart, settings, state: UiState::default() }
    }

    fn icon_url(&self, icon_id: &str, large: bool) -> String {
        let suffix = if large { "@2x" } else { "" };
        format!("{}/{icon_id}{suffix}.png", self.settings.icon_base_url)
    }

    pub fn render_current(&mut self, weather: &CurrentWeather) {
        let icon = self.icon_url(&weather.icon_id, true);
        let s = &mut self.surface;

        s.set_text(Region::Temperature, &degrees(weather.temperature_c));
        s.set_text(Region::FeelsLike, &format!("Feels like {}", degrees(weather.feels_like_c)));
        s.set_text(Region::Description, &weather.description);
        s.set_text(Region::Place, &weather.place_label());
        s.set_icon(&icon);
        s.set_text(
            Region::Advisory,
            &format!("🤖 Weather is {}", comfort_text(weather.temperature_c)),
        );
    }

    /// Redraw the temperature chart and the daily cards.
    pub fn render_forecast(&mut self, series: &ForecastSeries) {
        self.draw_chart(series);

        let cards: Vec<DailyCard> = series
            .daily_points()
            .map(|p| DailyCard {
                weekday: p.weekday_short(),
                icon_url: self.icon_url(&p.icon_id, false),
                temperature: degrees(p.temperature_c),
            })
            .collect();
        self.surface.set_daily_cards(&cards);
    }

    fn draw_chart(&mut self, series: &ForecastSeries) {
        let points = series.chart_points();
        let spec = ChartSpec {
            series_label: "Temperature (°C)",
            labels: points
                .iter()
                .map(|p| p.local_time().map(|t| t.format("%H:%M").to_string()).unwrap_or_default())
                .collect(),
            values: points.iter().map(|p| p.temperature_c).collect(),
            line_color: "#ff9800",
            fill_color: "rgba(255,152,0,0.2)",
        };

        if let Some(previous) = self.state.chart.take() {
            self.chart.destroy(previous);
        }
        self.state.chart = Some(self.chart.draw(&spec));
    }

    /// Fill the AQI panel and reveal it. Nothing is written for an unknown index.
    pub fn render_air_quality(&mut self, reading: &AirQualityReading) -> Result<(), AdvisoryError> {
        let level = aqi_descriptor(reading.index)?;
        let s = &mut self.surface;

        s.set_text(Region::AqiLabel, &format!("Air Quality: {}", level.label));
        s.set_text(
            Region::Particulates,
            &format!("PM2.5: {} | PM10: {}", reading.pm2_5, reading.pm10),
        );
        s.set_text(Region::HealthAdvice, &format!("Health Advice: {}", level.advice));
        s.set_aqi_bar(level.bar_width_percent(), level.color);
        s.show_aqi_panel();
        Ok(())
    }

    /// Open the map on first use; afterwards move the existing view and marker.
    pub fn load_map(&mut self, center: Location) {
        let zoom = self.settings.map_zoom;
        if self.state.map_open {
            self.map.set_view(center, zoom);
            self.map.move_marker(center);
        } else {
            debug!(?center, zoom, "Opening map");
            self.map.open(center, zoom);
            self.map.add_tile_layer(&self.settings.tile_url);
            self.map.add_marker(center);
            self.state.map_open = true;
        }
    }

    pub fn show_suggestions(&mut self, rows: &[CitySuggestion]) {
        self.surface.set_suggestions(rows);
    }

    pub fn clear_suggestions(&mut self) {
        self.surface.set_suggestions(&[]);
    }

    pub fn city_input(&self) -> String {
        self.surface.city_input()
    }

    pub fn set_city_input(&mut self, value: &str) {
        self.surface.set_city_input(value);
    }

    pub fn alert(&mut self, message: &str) {
        self.surface.alert(message);
    }
}
