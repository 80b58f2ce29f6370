//! `GlofWatch` - Glacial lake outburst flood risk estimation
//!
//! This library gathers recent weather history and local terrain for a
//! point, reduces them to a fixed feature record and scores that record
//! against a small additive rule set.

pub mod api;
pub mod config;
pub mod elevation;
pub mod error;
pub mod features;
pub mod models;
pub mod predictor;
pub mod risk;
pub mod slope;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::GlofConfig;
pub use elevation::{ElevationSource, OpenElevationClient};
pub use error::GlofError;
pub use features::FeatureBuilder;
pub use models::{
    Coordinate, ElevationSample, FeatureRecord, RiskLevel, RiskResult, SlopeEstimate,
    WeatherSeries,
};
pub use predictor::Predictor;
pub use risk::{RISK_RULES, RiskClassifier, RiskRule};
pub use slope::SlopeEstimator;
pub use weather::{OpenMeteoClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GlofError>;
