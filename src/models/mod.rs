//! Data models for the GlofWatch service
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: validated prediction target
//! - Weather: hourly weather history and elevation readings
//! - Features: terrain estimate and the classifier feature record
//! - Risk: risk level and prediction result

pub mod coordinate;
pub mod features;
pub mod risk;
pub mod weather;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use features::{FeatureRecord, SlopeEstimate};
pub use risk::{RiskLevel, RiskResult};
pub use weather::{ElevationSample, WeatherSeries};
