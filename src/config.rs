//! Configuration management for `GlofWatch`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. Risk thresholds
//! are deliberately absent: they are fixed in [`crate::risk`].

use crate::GlofError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `GlofWatch` service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlofConfig {
    /// Weather history API configuration
    pub weather: WeatherConfig,
    /// Elevation API configuration
    pub elevation: ElevationConfig,
    /// Slope sampling parameters
    pub slope: SlopeConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather history API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the OpenMeteo API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Days of history to request
    #[serde(default = "default_past_days")]
    pub past_days: u32,
}

/// Elevation API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationConfig {
    /// Base URL for the Open-Elevation API
    #[serde(default = "default_elevation_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_elevation_timeout")]
    pub timeout_seconds: u32,
}

/// Slope sampling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeConfig {
    /// Offset of the four sampling points in degrees
    #[serde(default = "default_slope_offset")]
    pub offset_degrees: f64,
    /// Meters per degree used to turn the offset into a run
    #[serde(default = "default_meters_per_degree")]
    pub meters_per_degree: f64,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    20
}

fn default_past_days() -> u32 {
    7
}

fn default_elevation_base_url() -> String {
    "https://api.open-elevation.com/api/v1".to_string()
}

fn default_elevation_timeout() -> u32 {
    10
}

fn default_slope_offset() -> f64 {
    crate::slope::DEFAULT_OFFSET_DEGREES
}

fn default_meters_per_degree() -> f64 {
    crate::slope::METERS_PER_DEGREE
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GlofConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig {
                base_url: default_weather_base_url(),
                timeout_seconds: default_weather_timeout(),
                past_days: default_past_days(),
            },
            elevation: ElevationConfig {
                base_url: default_elevation_base_url(),
                timeout_seconds: default_elevation_timeout(),
            },
            slope: SlopeConfig {
                offset_degrees: default_slope_offset(),
                meters_per_degree: default_meters_per_degree(),
            },
            server: ServerConfig {
                host: default_server_host(),
                port: default_server_port(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GlofConfig {
    /// Load configuration from `config_path`, or the default location when `None`,
    /// with environment variable overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GLOFWATCH_WEATHER__TIMEOUT_SECONDS=30 overrides weather.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("GLOFWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GlofConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glofwatch").join("config.toml"))
    }

    /// Apply default values to empty or zeroed fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.elevation.base_url.is_empty() {
            self.elevation.base_url = default_elevation_base_url();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Weather", self.weather.timeout_seconds),
            ("Elevation", self.elevation.timeout_seconds),
        ] {
            if timeout == 0 {
                return Err(
                    GlofError::config(format!("{name} API timeout must be at least 1 second"))
                        .into(),
                );
            }
            if timeout > 300 {
                return Err(GlofError::config(format!(
                    "{name} API timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        // The feature window needs a full week; OpenMeteo serves at most 92 past days
        if !(7..=92).contains(&self.weather.past_days) {
            return Err(GlofError::config("Weather past_days must be between 7 and 92").into());
        }

        if !(self.slope.offset_degrees.is_finite() && self.slope.offset_degrees > 0.0) {
            return Err(GlofError::config("Slope offset must be a positive number of degrees").into());
        }

        if !(self.slope.meters_per_degree.is_finite() && self.slope.meters_per_degree > 0.0) {
            return Err(GlofError::config("Slope meters_per_degree must be positive").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GlofError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GlofError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather", &self.weather.base_url),
            ("Elevation", &self.elevation.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GlofError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
