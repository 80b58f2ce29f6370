//! End-to-end prediction pipeline
//!
//! Weather history and the slope estimate are independent and fetched
//! concurrently; the first failure aborts the other and fails the request.

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, instrument};

use crate::config::GlofConfig;
use crate::elevation::{ElevationSource, OpenElevationClient};
use crate::features::FeatureBuilder;
use crate::models::{Coordinate, RiskResult};
use crate::risk::RiskClassifier;
use crate::slope::SlopeEstimator;
use crate::weather::{OpenMeteoClient, WeatherSource};
use crate::{GlofError, Result};

pub struct Predictor {
    weather: Arc<dyn WeatherSource>,
    slope: SlopeEstimator,
}

impl Predictor {
    pub fn new(weather: Arc<dyn WeatherSource>, slope: SlopeEstimator) -> Self {
        Self { weather, slope }
    }

    /// Wire the production sources onto one shared HTTP client
    pub fn from_config(client: Client, config: &GlofConfig) -> Self {
        let weather = Arc::new(OpenMeteoClient::new(client.clone(), &config.weather));
        let elevation: Arc<dyn ElevationSource> =
            Arc::new(OpenElevationClient::new(client, &config.elevation));
        Self::new(weather, SlopeEstimator::from_config(elevation, &config.slope))
    }

    /// Estimate outburst risk at `at` given the observed lake area change
    #[instrument(skip(self), fields(lat = at.latitude(), lon = at.longitude()))]
    pub async fn predict(&self, at: Coordinate, area_change_pct: f64) -> Result<RiskResult> {
        if !area_change_pct.is_finite() {
            return Err(GlofError::invalid_input(
                "area_change_pct must be a finite number",
            ));
        }

        let (series, slope) =
            tokio::try_join!(self.weather.hourly_history(at), self.slope.estimate(at))?;

        let features = FeatureBuilder::build(&series, &slope, area_change_pct)?;
        let (risk_level, score) = RiskClassifier::classify(&features);

        info!(
            "Risk at {}: {} (score {}, rules: {:?})",
            at.format_coordinates(),
            risk_level,
            score,
            RiskClassifier::triggered_rules(&features)
        );

        Ok(RiskResult {
            risk_level,
            score,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElevationSample, RiskLevel, WeatherSeries};
    use async_trait::async_trait;

    struct FixedWeather {
        precipitation: Vec<f64>,
        temperature: Vec<f64>,
    }

    #[async_trait]
    impl WeatherSource for FixedWeather {
        async fn hourly_history(&self, _at: Coordinate) -> Result<WeatherSeries> {
            WeatherSeries::new(self.precipitation.clone(), self.temperature.clone())
        }
    }

    struct FailingWeather;

    #[async_trait]
    impl WeatherSource for FailingWeather {
        async fn hourly_history(&self, _at: Coordinate) -> Result<WeatherSeries> {
            Err(GlofError::malformed_response("weather", "missing hourly.precipitation"))
        }
    }

    /// Elevation rising by `rise` meters across the north-south baseline
    struct Ridge {
        center: Coordinate,
        base: f64,
        rise: f64,
    }

    #[async_trait]
    impl ElevationSource for Ridge {
        async fn elevation(&self, at: Coordinate) -> Result<ElevationSample> {
            let meters = if at.latitude() > self.center.latitude() {
                self.base + self.rise / 2.0
            } else if at.latitude() < self.center.latitude() {
                self.base - self.rise / 2.0
            } else {
                self.base
            };
            Ok(ElevationSample::new(meters))
        }
    }

    struct FailingElevation;

    #[async_trait]
    impl ElevationSource for FailingElevation {
        async fn elevation(&self, _at: Coordinate) -> Result<ElevationSample> {
            Err(GlofError::upstream_unavailable("elevation", "connection reset"))
        }
    }

    fn center() -> Coordinate {
        Coordinate::new(27.9, 86.9).unwrap()
    }

    /// precip_7d = 250, precip_48h = 120, temp_recent = 10, temp_week = 5
    fn stormy_week() -> FixedWeather {
        let mut precipitation = vec![0.0; 120];
        precipitation[0] = 130.0;
        precipitation.extend(vec![2.5; 48]);
        let mut temperature = vec![0.0; 24];
        temperature.extend(vec![5.0; 120]);
        temperature.extend(vec![10.0; 24]);
        FixedWeather {
            precipitation,
            temperature,
        }
    }

    fn quiet_week() -> FixedWeather {
        FixedWeather {
            precipitation: vec![0.0; 192],
            temperature: vec![-3.0; 192],
        }
    }

    fn predictor(weather: impl WeatherSource + 'static, base: f64, rise: f64) -> Predictor {
        let ridge = Arc::new(Ridge {
            center: center(),
            base,
            rise,
        });
        Predictor::new(Arc::new(weather), SlopeEstimator::new(ridge))
    }

    #[tokio::test]
    async fn test_every_rule_fires_high() {
        // 22.2 m over 111 m => slope 0.2
        let predictor = predictor(stormy_week(), 2500.0, 22.2);
        let result = predictor.predict(center(), 40.0).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.score, 7);
        assert_eq!(result.features.precip_48h, 120.0);
        assert_eq!(result.features.precip_7d, 250.0);
        assert_eq!(result.features.temp_anomaly, 5.0);
        assert!((result.features.slope - 0.2).abs() < 1e-9);
        assert!((result.features.elevation_mean - 2500.0).abs() < 1e-9);
        assert_eq!(result.features.area_change_pct, 40.0);
    }

    #[tokio::test]
    async fn test_quiet_location_low() {
        // 1.11 m over 111 m => slope 0.01
        let predictor = predictor(quiet_week(), 4000.0, 1.11);
        let result = predictor.predict(center(), 0.0).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.score, 0);
    }

    #[tokio::test]
    async fn test_expanding_lake_alone_medium() {
        let predictor = predictor(quiet_week(), 4000.0, 1.11);
        let result = predictor.predict(center(), 30.0).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.score, 2);
    }

    #[tokio::test]
    async fn test_short_history_is_insufficient() {
        let weather = FixedWeather {
            precipitation: vec![0.0; 100],
            temperature: vec![0.0; 100],
        };
        let predictor = predictor(weather, 4000.0, 0.0);
        let err = predictor.predict(center(), 0.0).await.unwrap_err();
        assert!(matches!(err, GlofError::InsufficientData { available: 100, .. }));
    }

    #[tokio::test]
    async fn test_weather_failure_fails_request() {
        let predictor = predictor(FailingWeather, 4000.0, 0.0);
        let err = predictor.predict(center(), 0.0).await.unwrap_err();
        assert!(matches!(err, GlofError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_elevation_failure_fails_request() {
        let predictor = Predictor::new(
            Arc::new(quiet_week()),
            SlopeEstimator::new(Arc::new(FailingElevation)),
        );
        let err = predictor.predict(center(), 0.0).await.unwrap_err();
        assert!(matches!(err, GlofError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_non_finite_area_change_rejected() {
        let predictor = predictor(quiet_week(), 4000.0, 0.0);
        let err = predictor.predict(center(), f64::NAN).await.unwrap_err();
        assert!(matches!(err, GlofError::InvalidInput { .. }));
    }
}
