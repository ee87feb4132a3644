use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use weatherboard_core::{
    BackendClient, Config, Dashboard, FileStore, FixedPosition, Location, Presenter,
    PresenterSettings, RecentCitiesStore,
};

use crate::terminal::{TerminalChart, TerminalMap, TerminalSurface};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherboard", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the weather backend address.
    Configure,

    /// Show weather, air quality and forecast for a city.
    Show {
        /// City name; prompted for when absent.
        city: Option<String>,
    },

    /// Show weather for a position.
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Search cities by prefix and show the chosen one.
    Search {
        /// At least two characters.
        prefix: String,
    },

    /// Search by voice.
    Voice,

    /// List recently looked-up cities.
    Recent,
}

type TerminalDashboard = Dashboard<BackendClient, FileStore>;

fn build_dashboard(config: &Config, input: &str) -> anyhow::Result<TerminalDashboard> {
    let client = BackendClient::from_config(config).context("Failed to create HTTP client")?;
    let recent = RecentCitiesStore::new(FileStore::new(Config::recent_cities_path()?));
    let presenter = Presenter::new(
        Box::new(TerminalSurface::with_input(input)),
        Box::new(TerminalMap::default()),
        Box::new(TerminalChart::default()),
        PresenterSettings::from(config),
    );

    // No speech recognizer in a terminal: `voice` only reports that.
    Ok(Dashboard::new(client, recent, presenter))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        tracing::debug!(backend = %config.backend_url, "Configuration loaded");

        match self.command {
            Command::Configure => configure(config)?,
            Command::Show { city } => {
                let city = match city {
                    Some(c) => c,
                    None => Text::new("City:").prompt()?,
                };
                println!("Weather at {}", Local::now().format("%H:%M"));
                build_dashboard(&config, &city)?.submit_city(None).await?;
            }
            Command::Locate { lat, lon } => {
                build_dashboard(&config, "")?
                    .with_geolocator(FixedPosition(Location::new(lat, lon)))
                    .locate()
                    .await?;
            }
            Command::Search { prefix } => {
                let board = build_dashboard(&config, &prefix)?;
                let rows = board.autocomplete(&prefix).await?;
                if rows.is_empty() {
                    println!("No matching cities.");
                    return Ok(());
                }
                let choice = Select::new("Pick a city:", rows).prompt()?;
                board.select_suggestion(&choice).await?;
            }
            Command::Voice => build_dashboard(&config, "")?.voice_search().await?,
            Command::Recent => {
                let cities = build_dashboard(&config, "")?.recent_cities().await?;
                if cities.is_empty() {
                    println!("No recent cities yet.");
                }
                for (i, city) in cities.iter().enumerate() {
                    println!("{}. {city}", i + 1);
                }
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let url = Text::new("Backend URL:")
        .with_default(&config.backend_url)
        .prompt()?;

    config.set_backend_url(&url)?;
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
