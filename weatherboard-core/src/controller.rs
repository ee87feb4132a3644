//! UI triggers wired to the weather client and the presenter.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    client::{ClientError, WeatherClient},
    model::{CitySuggestion, CurrentWeather, Location},
    presentation::Presenter,
    recent::{KeyValueStore, RecentCitiesStore},
};

/// Shown when the backend reports a non-200 status for a city lookup.
pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found or API error";

/// Shown when voice search is requested without a recognizer.
pub const VOICE_UNSUPPORTED_MESSAGE: &str = "Voice search is not supported on this device";

/// Shortest query that triggers an autocomplete request.
pub const MIN_SUGGESTION_QUERY: usize = 2;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
}

/// One-shot position fix.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Location, LocationError>;
}

/// One-shot speech recognition.
#[async_trait]
pub trait VoiceRecognizer: Send + Sync {
    fn is_available(&self) -> bool;

    /// The single transcript of one session, or `None` if nothing was heard.
    async fn recognize_once(&self) -> Result<Option<String>>;
}

/// Geolocator for platforms without positioning.
#[derive(Debug, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<Location, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// A fix known up front, e.g. passed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Location);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Location, LocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Default)]
pub struct NoVoice;

#[async_trait]
impl VoiceRecognizer for NoVoice {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize_once(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Dashboard controller: owns the client, the recent-cities store and the presenter.
///
/// Every weather lookup takes a ticket; results of a lookup that has since been
/// superseded are dropped instead of rendered.
pub struct Dashboard<C, S> {
    client: C,
    recent: Mutex<RecentCitiesStore<S>>,
    presenter: Mutex<Presenter>,
    geolocator: Box<dyn Geolocator>,
    voice: Box<dyn VoiceRecognizer>,
    generation: AtomicU64,
}

impl<C, S> Dashboard<C, S>
where
    C: WeatherClient,
    S: KeyValueStore + Send,
{
    pub fn new(client: C, recent: RecentCitiesStore<S>, presenter: Presenter) -> Self {
        Self {
            client,
            recent: Mutex::new(recent),
            presenter: Mutex::new(presenter),
            geolocator: Box::new(NoGeolocation),
            voice: Box::new(NoVoice),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_geolocator(mut self, geolocator: impl Geolocator + 'static) -> Self {
        self.geolocator = Box::new(geolocator);
        self
    }

    pub fn with_voice(mut self, voice: impl VoiceRecognizer + 'static) -> Self {
        self.voice = Box::new(voice);
        self
    }

    pub async fn recent_cities(&self) -> Result<Vec<String>> {
        Ok(self.recent.lock().await.cities()?)
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Look up a city, from `city` or else from the city input.
    ///
    /// An empty city does nothing. The city is recorded before the request, so it
    /// stays in the recent list even when the backend rejects it. A non-200 status
    /// alerts the user and stops there.
    pub async fn submit_city(&self, city: Option<&str>) -> Result<()> {
        let city = match city.filter(|c| !c.trim().is_empty()) {
            Some(c) => c.trim().to_owned(),
            None => self.presenter.lock().await.city_input().trim().to_owned(),
        };
        if city.is_empty() {
            return Ok(());
        }

        self.recent
            .lock()
            .await
            .add(&city)
            .context("Failed to save recent city")?;

        let ticket = self.next_ticket();
        let weather = match self.client.fetch_current_by_city(&city).await {
            Ok(w) => w,
            Err(ClientError::Upstream { code, message }) => {
                warn!(%city, code, %message, "City lookup rejected by backend");
                if self.is_current(ticket) {
                    self.presenter.lock().await.alert(CITY_NOT_FOUND_MESSAGE);
                }
                return Ok(());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to fetch weather for '{city}'"));
            }
        };

        info!(%city, temp = weather.temperature_c, "Weather loaded");
        self.show_weather(ticket, &weather, weather.location).await;
        Ok(())
    }

    /// Weather for the device position. The place is not added to the recent cities.
    pub async fn locate(&self) -> Result<()> {
        let position = self
            .geolocator
            .current_position()
            .await
            .context("Failed to determine current position")?;

        let ticket = self.next_ticket();
        let weather = self
            .client
            .fetch_current_by_coords(position)
            .await
            .context("Failed to fetch weather for current position")?;

        info!(?position, place = %weather.place_name, "Weather loaded");
        self.show_weather(ticket, &weather, position).await;
        Ok(())
    }

    /// Fill the city input from one recognition session and submit it.
    pub async fn voice_search(&self) -> Result<()> {
        if !self.voice.is_available() {
            self.presenter.lock().await.alert(VOICE_UNSUPPORTED_MESSAGE);
            return Ok(());
        }

        let Some(transcript) = self.voice.recognize_once().await? else {
            debug!("Voice session ended without a result");
            return Ok(());
        };

        self.presenter.lock().await.set_city_input(&transcript);
        self.submit_city(None).await
    }

    /// Refresh the suggestion rows for `query` and return them.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<CitySuggestion>> {
        if query.chars().count() < MIN_SUGGESTION_QUERY {
            self.presenter.lock().await.clear_suggestions();
            return Ok(Vec::new());
        }

        let rows = self
            .client
            .suggest_cities(query)
            .await
            .with_context(|| format!("Failed to fetch suggestions for '{query}'"))?;

        self.presenter.lock().await.show_suggestions(&rows);
        Ok(rows)
    }

    /// Activate a suggestion row: fill the input, clear the rows, look the city up.
    pub async fn select_suggestion(&self, suggestion: &CitySuggestion) -> Result<()> {
        {
            let mut presenter = self.presenter.lock().await;
            presenter.set_city_input(&suggestion.name);
            presenter.clear_suggestions();
        }
        self.submit_city(Some(&suggestion.name)).await
    }

    /// Render the current weather, move the map, then fetch AQI and forecast together.
    async fn show_weather(&self, ticket: u64, weather: &CurrentWeather, center: Location) {
        {
            let mut presenter = self.presenter.lock().await;
            if !self.is_current(ticket) {
                debug!(ticket, "Dropping superseded weather");
                return;
            }
            presenter.render_current(weather);
            presenter.load_map(center);
        }

        tokio::join!(
            self.refresh_air_quality(ticket, center),
            self.refresh_forecast(ticket, center)
        );
    }

    async fn refresh_air_quality(&self, ticket: u64, location: Location) {
        let reading = match self.client.fetch_air_quality(location).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Air quality unavailable");
                return;
            }
        };

        let mut presenter = self.presenter.lock().await;
        if !self.is_current(ticket) {
            debug!(ticket, "Dropping superseded air quality");
            return;
        }
        if let Err(e) = presenter.render_air_quality(&reading) {
            warn!(error = %e, "Air quality not shown");
        }
    }

    async fn refresh_forecast(&self, ticket: u64, location: Location) {
        let series = match self.client.fetch_forecast(location).await {
            Ok(Some(series)) => series,
            Ok(None) => {
                debug!("Forecast response has no list, skipping");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Forecast unavailable");
                return;
            }
        };

        let mut presenter = self.presenter.lock().await;
        if !self.is_current(ticket) {
            debug!(ticket, "Dropping superseded forecast");
            return;
        }
        presenter.render_forecast(&series);
    }
}
