//! Recording widgets shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use weatherboard_core::{
    BackendClient, ChartHandle, ChartSpec, ChartWidget, CitySuggestion, DailyCard, Location,
    MapWidget, Presenter, PresenterSettings, Region, Surface,
};
use wiremock::MockServer;

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    Open(Location, u8),
    Tiles(String),
    Marker(Location),
    View(Location, u8),
    Move(Location),
}

#[derive(Debug, Default)]
pub struct Screen {
    pub text: HashMap<Region, String>,
    pub icon: Option<String>,
    pub bar: Option<(u8, String)>,
    pub aqi_visible: bool,
    pub cards: Vec<DailyCard>,
    pub suggestions: Vec<CitySuggestion>,
    pub input: String,
    pub alerts: Vec<String>,
    pub map: Vec<MapCall>,
    pub charts: Vec<ChartSpec>,
}

/// One recorder standing in for all three widgets.
#[derive(Clone, Default)]
pub struct Recorder(pub Arc<Mutex<Screen>>);

impl Recorder {
    pub fn presenter(&self) -> Presenter {
        Presenter::new(
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
            PresenterSettings::default(),
        )
    }

    pub fn screen(&self) -> std::sync::MutexGuard<'_, Screen> {
        self.0.lock().expect("screen lock")
    }
}

impl Surface for Recorder {
    fn set_text(&mut self, region: Region, text: &str) {
        self.screen().text.insert(region, text.to_owned());
    }
    fn set_icon(&mut self, url: &str) {
        self.screen().icon = Some(url.to_owned());
    }
    fn set_aqi_bar(&mut self, width_percent: u8, color: &str) {
        self.screen().bar = Some((width_percent, color.to_owned()));
    }
    fn show_aqi_panel(&mut self) {
        self.screen().aqi_visible = true;
    }
    fn set_daily_cards(&mut self, cards: &[DailyCard]) {
        self.screen().cards = cards.to_vec();
    }
    fn set_suggestions(&mut self, rows: &[CitySuggestion]) {
        self.screen().suggestions = rows.to_vec();
    }
    fn city_input(&self) -> String {
        self.screen().input.clone()
    }
    fn set_city_input(&mut self, value: &str) {
        self.screen().input = value.to_owned();
    }
    fn alert(&mut self, message: &str) {
        self.screen().alerts.push(message.to_owned());
    }
}

impl MapWidget for Recorder {
    fn open(&mut self, center: Location, zoom: u8) {
        self.screen().map.push(MapCall::Open(center, zoom));
    }
    fn add_tile_layer(&mut self, url_template: &str) {
        self.screen().map.push(MapCall::Tiles(url_template.to_owned()));
    }
    fn add_marker(&mut self, at: Location) {
        self.screen().map.push(MapCall::Marker(at));
    }
    fn set_view(&mut self, center: Location, zoom: u8) {
        self.screen().map.push(MapCall::View(center, zoom));
    }
    fn move_marker(&mut self, to: Location) {
        self.screen().map.push(MapCall::Move(to));
    }
}

impl ChartWidget for Recorder {
    fn draw(&mut self, spec: &ChartSpec) -> ChartHandle {
        let mut screen = self.screen();
        screen.charts.push(spec.clone());
        ChartHandle(screen.charts.len() as u64)
    }
    fn destroy(&mut self, _handle: ChartHandle) {}
}

pub fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::new(server.uri()).expect("client creation")
}

pub fn paris_weather() -> serde_json::Value {
    serde_json::json!({
        "cod": 200,
        "main": { "temp": 32, "feels_like": 33 },
        "weather": [{ "description": "clear", "icon": "01d" }],
        "name": "Paris",
        "sys": { "country": "FR" },
        "coord": { "lat": 48.85, "lon": 2.35 }
    })
}

pub fn air_quality(index: i64) -> serde_json::Value {
    serde_json::json!({
        "list": [{
            "main": { "aqi": index },
            "components": { "pm2_5": 8.5, "pm10": 14.2 }
        }]
    })
}

/// `count` 3-hourly points starting 2024-01-01 00:00 UTC.
pub fn forecast(count: i64) -> serde_json::Value {
    let start = 1_704_067_200_i64;
    let list: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let dt = start + i * 10_800;
            let day = 1 + (i * 3) / 24;
            let hour = (i * 3) % 24;
            serde_json::json!({
                "dt": dt,
                "dt_txt": format!("2024-01-{day:02} {hour:02}:00:00"),
                "main": { "temp": i as f64 },
                "weather": [{ "icon": "03d" }]
            })
        })
        .collect();
    serde_json::json!({ "cod": "200", "list": list })
}
