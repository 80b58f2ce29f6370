//! Hourly weather history and elevation readings

use serde::Serialize;

use crate::{GlofError, Result};

/// Hourly precipitation (mm) and temperature (°C), aligned by index,
/// most recent sample last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSeries {
    precipitation: Vec<f64>,
    temperature: Vec<f64>,
}

impl WeatherSeries {
    /// Build a series; both sequences must have the same length.
    ///
    /// Series only ever come from a weather source, so a mismatch is the
    /// upstream's fault and reported as a malformed response.
    pub fn new(precipitation: Vec<f64>, temperature: Vec<f64>) -> Result<Self> {
        if precipitation.len() != temperature.len() {
            return Err(GlofError::malformed_response(
                "weather",
                format!(
                    "precipitation and temperature series differ in length ({} vs {})",
                    precipitation.len(),
                    temperature.len()
                ),
            ));
        }
        Ok(Self {
            precipitation,
            temperature,
        })
    }

    /// Number of hourly samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.precipitation.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.precipitation.is_empty()
    }

    #[must_use]
    pub fn precipitation(&self) -> &[f64] {
        &self.precipitation
    }

    #[must_use]
    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    /// Last `hours` precipitation samples, or the whole series if shorter
    #[must_use]
    pub fn trailing_precipitation(&self, hours: usize) -> &[f64] {
        trailing(&self.precipitation, hours)
    }

    /// Last `hours` temperature samples, or the whole series if shorter
    #[must_use]
    pub fn trailing_temperature(&self, hours: usize) -> &[f64] {
        trailing(&self.temperature, hours)
    }
}

fn trailing(values: &[f64], hours: usize) -> &[f64] {
    &values[values.len().saturating_sub(hours)..]
}

/// Point elevation in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationSample {
    pub meters: f64,
}

impl ElevationSample {
    #[must_use]
    pub fn new(meters: f64) -> Self {
        Self { meters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_rejects_unequal_lengths() {
        let err = WeatherSeries::new(vec![0.0; 3], vec![0.0; 2]).unwrap_err();
        assert!(matches!(err, GlofError::MalformedResponse { .. }));
        assert_eq!(err.kind(), "malformed_response");
    }

    #[test]
    fn test_trailing_windows() {
        let series =
            WeatherSeries::new(vec![1.0, 2.0, 3.0, 4.0], vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.trailing_precipitation(2), &[3.0, 4.0]);
        assert_eq!(series.trailing_temperature(1), &[40.0]);
        assert_eq!(series.trailing_precipitation(10), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_series() {
        let series = WeatherSeries::new(vec![], vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.trailing_temperature(24).is_empty());
    }
}
