//! Terminal renditions of the dashboard widgets.

use std::f64::consts::PI;

use weatherboard_core::{
    ChartHandle, ChartSpec, ChartWidget, CitySuggestion, DailyCard, Location, MapWidget, Region,
    Surface,
};

const BAR_WIDTH: usize = 30;

/// Prints each region as a labelled line as soon as it is written.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    input: String,
}

impl TerminalSurface {
    pub fn with_input(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

fn region_label(region: Region) -> Option<&'static str> {
    match region {
        Region::Temperature => Some("Temperature"),
        Region::Description => Some("Conditions"),
        Region::Place => Some("Place"),
        // These already carry their own prefix.
        Region::FeelsLike
        | Region::Advisory
        | Region::AqiLabel
        | Region::Particulates
        | Region::HealthAdvice => None,
    }
}

impl Surface for TerminalSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        match region_label(region) {
            Some(label) => println!("  {label}: {text}"),
            None => println!("  {text}"),
        }
    }

    fn set_icon(&mut self, url: &str) {
        println!("  Icon: {url}");
    }

    fn set_aqi_bar(&mut self, width_percent: u8, color: &str) {
        let filled = BAR_WIDTH * usize::from(width_percent) / 100;
        println!(
            "  [{}{}] {width_percent}% ({color})",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled)
        );
    }

    fn show_aqi_panel(&mut self) {
        println!();
    }

    fn set_daily_cards(&mut self, cards: &[DailyCard]) {
        if cards.is_empty() {
            return;
        }
        println!("  Daily:");
        for card in cards {
            println!("    {:<4} {:>6}  {}", card.weekday, card.temperature, card.icon_url);
        }
    }

    fn set_suggestions(&mut self, rows: &[CitySuggestion]) {
        for row in rows {
            println!("  - {row}");
        }
    }

    fn city_input(&self) -> String {
        self.input.clone()
    }

    fn set_city_input(&mut self, value: &str) {
        self.input = value.to_owned();
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }
}

/// Tile coordinates of `at` at `zoom` in the usual web-mercator scheme.
pub fn tile_for(at: Location, zoom: u8) -> (u32, u32) {
    let n = f64::from(1u32 << zoom.min(31));
    let lat = at.latitude.clamp(-85.0511, 85.0511).to_radians();
    let x = ((at.longitude + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();
    let max = n - 1.0;
    (x.clamp(0.0, max) as u32, y.clamp(0.0, max) as u32)
}

/// Describes the map view and the tile under the marker.
#[derive(Debug, Default)]
pub struct TerminalMap {
    tile_url: String,
    zoom: u8,
}

impl TerminalMap {
    fn tile_address(&self, at: Location) -> String {
        let (x, y) = tile_for(at, self.zoom);
        self.tile_url
            .replace("{s}", "a")
            .replace("{z}", &self.zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl MapWidget for TerminalMap {
    fn open(&mut self, center: Location, zoom: u8) {
        self.zoom = zoom;
        println!("  Map: {:.4}, {:.4} (zoom {zoom})", center.latitude, center.longitude);
    }

    fn add_tile_layer(&mut self, url_template: &str) {
        self.tile_url = url_template.to_owned();
    }

    fn add_marker(&mut self, at: Location) {
        println!("  Marker tile: {}", self.tile_address(at));
    }

    fn set_view(&mut self, center: Location, zoom: u8) {
        self.zoom = zoom;
        println!("  Map moved: {:.4}, {:.4} (zoom {zoom})", center.latitude, center.longitude);
    }

    fn move_marker(&mut self, to: Location) {
        println!("  Marker tile: {}", self.tile_address(to));
    }
}

/// Horizontal bar chart, one row per point.
#[derive(Debug, Default)]
pub struct TerminalChart {
    drawn: u64,
}

impl ChartWidget for TerminalChart {
    fn draw(&mut self, spec: &ChartSpec) -> ChartHandle {
        self.drawn += 1;
        println!("  {}:", spec.series_label);

        let min = spec.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = spec.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = (max - min).max(1.0);

        for (label, value) in spec.labels.iter().zip(&spec.values) {
            let len = 1 + ((value - min) / span * (BAR_WIDTH - 1) as f64).round() as usize;
            println!("    {label:>5} {:<width$} {value:.1}", "█".repeat(len), width = BAR_WIDTH);
        }

        ChartHandle(self.drawn)
    }

    fn destroy(&mut self, handle: ChartHandle) {
        tracing::trace!(?handle, "Chart replaced");
    }
}
