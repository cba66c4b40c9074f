use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ValidationError;

/// Environment variable consulted first for the OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Prefix for environment overrides, e.g. `AGRIMINDER_WEATHER__TIMEOUT_SECS=5`.
const ENV_PREFIX: &str = "AGRIMINDER";

const APP_DIR_NAME: &str = "agriminder";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "agriminder.db";

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError::new(field, message));
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationError::new(field, message));
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Local data file settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Forecast provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Dashboard layout
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite data file
    pub path: PathBuf,
}

impl DatabaseConfig {
    fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(DATABASE_FILE_NAME),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_dir(&default_config_dir())
    }
}

/// Measurement system requested from the forecast API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the forecast API (the `/forecast` path is appended)
    pub api_base_url: String,

    pub units: Units,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// How long a successful forecast is reused, in minutes
    pub cache_ttl_minutes: u64,

    /// API key fallback when `OPENWEATHER_API_KEY` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            units: Units::Metric,
            timeout_secs: 10,
            cache_ttl_minutes: 10,
            api_key: None,
        }
    }
}

impl WeatherConfig {
    /// Resolve the API key: environment first, then the config file.
    ///
    /// Blank values count as absent. `None` is a normal condition that the
    /// forecast call reports as a missing key.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Upcoming reminders shown on the dashboard
    pub upcoming_reminders: usize,

    /// Forecast days shown on the dashboard
    pub forecast_days: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_reminders: 2,
            forecast_days: 2,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Self::with_config_dir(default_config_dir())
    }
}

impl Config {
    /// Default configuration rooted at `config_dir`
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            database: DatabaseConfig::in_dir(&config_dir),
            weather: WeatherConfig::default(),
            dashboard: DashboardConfig::default(),
            config_dir,
        }
    }

    /// Load configuration from the user config directory, creating defaults
    /// if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, layering `AGRIMINDER_*` environment
    /// overrides on top of the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let config = Self::with_config_dir(dir);
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
        }

        let layered = config::Config::builder()
            .add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read config file")?;

        // Without an explicit data path, keep the data file beside the config
        let has_database_path = layered.get::<PathBuf>("database.path").is_ok();

        let mut config: Config = layered
            .try_deserialize()
            .context("Failed to parse config file")?;

        if !has_database_path {
            config.database = DatabaseConfig::in_dir(&config.config_dir);
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.weather.api_base_url,
            "weather.api_base_url",
            &mut result,
        );

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning(
                "weather.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.weather.cache_ttl_minutes == 0 {
            result.add_warning(
                "weather.cache_ttl_minutes",
                "Forecast caching disabled (0 minutes)",
            );
        }

        if self.weather.resolve_api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured - set {} to enable forecasts", API_KEY_ENV),
            );
        }

        if self.dashboard.upcoming_reminders == 0 {
            result.add_warning(
                "dashboard.upcoming_reminders",
                "Upcoming reminders hidden (0)",
            );
        }

        if self.dashboard.forecast_days == 0 {
            result.add_warning("dashboard.forecast_days", "Forecast hidden (0 days)");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }
}
