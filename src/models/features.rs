//! Derived terrain and feature records

use serde::{Deserialize, Serialize};

/// Local terrain steepness (rise over run, m/m) and mean sampled elevation (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeEstimate {
    pub slope: f64,
    pub elevation_mean: f64,
}

/// Fixed-shape feature vector consumed by the risk classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Precipitation summed over the trailing 48 hours (mm)
    pub precip_48h: f64,
    /// Precipitation summed over the trailing 7 days (mm)
    pub precip_7d: f64,
    /// Mean temperature over the trailing 24 hours (°C)
    pub temp_recent: f64,
    /// Mean temperature over the trailing 7 days (°C)
    pub temp_week: f64,
    /// `temp_recent - temp_week`
    pub temp_anomaly: f64,
    pub slope: f64,
    pub elevation_mean: f64,
    /// Caller-supplied lake area change; negative means shrinking
    pub area_change_pct: f64,
}
