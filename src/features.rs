//! Reduces weather history and terrain readings to a [`FeatureRecord`]

use crate::models::{FeatureRecord, SlopeEstimate, WeatherSeries};
use crate::{GlofError, Result};

/// Hours in the most recent day
pub const DAY_HOURS: usize = 24;
/// Hours in the most recent two days
pub const TWO_DAY_HOURS: usize = 48;
/// Hours in the trailing week; also the minimum accepted series length
pub const WEEK_HOURS: usize = 168;

pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Build the feature record for one prediction.
    ///
    /// A series shorter than a week is rejected rather than summed partially.
    pub fn build(
        series: &WeatherSeries,
        slope: &SlopeEstimate,
        area_change_pct: f64,
    ) -> Result<FeatureRecord> {
        if series.len() < WEEK_HOURS {
            return Err(GlofError::InsufficientData {
                required: WEEK_HOURS,
                available: series.len(),
            });
        }

        let precip_48h = sum(series.trailing_precipitation(TWO_DAY_HOURS));
        let precip_7d = sum(series.trailing_precipitation(WEEK_HOURS));
        let temp_recent = mean(series.trailing_temperature(DAY_HOURS));
        let temp_week = mean(series.trailing_temperature(WEEK_HOURS));

        Ok(FeatureRecord {
            precip_48h,
            precip_7d,
            temp_recent,
            temp_week,
            temp_anomaly: temp_recent - temp_week,
            slope: slope.slope,
            elevation_mean: slope.elevation_mean,
            area_change_pct,
        })
    }
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

// Callers guarantee a non-empty slice.
fn mean(values: &[f64]) -> f64 {
    sum(values) / values.len() as f64
}
