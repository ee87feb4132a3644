use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// backend_url = "http://localhost:3000"
/// timeout_secs = 10
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base address of the weather proxy.
    pub backend_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Zoom level of the map widget.
    pub map_zoom: u8,

    /// Tile layer template handed to the map widget.
    pub tile_url: String,

    /// Prefix of weather icon images.
    pub icon_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
            map_zoom: 10,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            icon_base_url: "https://openweathermap.org/img/wn".to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        let url = self.backend_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!(
                "Invalid backend_url '{}': expected an http:// or https:// address.\n\
                 Hint: run `weatherboard configure` to fix it.",
                self.backend_url
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Replace the backend address after validating it.
    pub fn set_backend_url(&mut self, url: &str) -> Result<()> {
        let mut updated = self.clone();
        updated.backend_url = url.trim().trim_end_matches('/').to_string();
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weatherboard", "weatherboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the persisted recent-cities store.
    pub fn recent_cities_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("recent.json"))
    }
}
