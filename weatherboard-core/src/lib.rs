//! Core library for the `weatherboard` dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - The client for the weather proxy (current weather, forecast, air quality, city search)
//! - Advisory rules and the recent-cities store
//! - Presentation over injected display, map and chart widgets
//! - The controller wiring user triggers to all of the above
//!
//! It is used by `weatherboard-cli`, but any front end providing the widget traits can drive it.

pub mod advisory;
pub mod client;
pub mod config;
pub mod controller;
pub mod model;
pub mod presentation;
pub mod recent;

pub use advisory::{AdvisoryError, AqiLevel, aqi_descriptor, comfort_text};
pub use client::{BackendClient, ClientError, WeatherClient};
pub use config::Config;
pub use controller::{Dashboard, FixedPosition, Geolocator, LocationError, NoVoice, VoiceRecognizer};
pub use model::{
    AirQualityReading, CitySuggestion, CurrentWeather, ForecastPoint, ForecastSeries, Location,
};
pub use presentation::{
    ChartHandle, ChartSpec, ChartWidget, DailyCard, MapWidget, Presenter, PresenterSettings,
    Region, Surface,
};
pub use recent::{FileStore, KeyValueStore, MemoryStore, RecentCitiesStore, StoreError};
