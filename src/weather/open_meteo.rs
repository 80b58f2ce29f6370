//! Weather history client for the `OpenMeteo` forecast API
//!
//! Requests `past_days` of hourly temperature and precipitation in UTC and
//! drops any forecast hours after the current one, so the series ends at
//! the most recent observed hour. A response without `hourly.time` is
//! taken as already ending at the current hour; a `time` array that does
//! not line up with the values is malformed.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use super::WeatherSource;
use crate::config::WeatherConfig;
use crate::models::{Coordinate, WeatherSeries};
use crate::{GlofError, Result};

const UPSTREAM: &str = "weather";

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    past_days: u32,
}

impl OpenMeteoClient {
    /// Create a client on top of a shared HTTP client
    #[must_use]
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds.into()),
            past_days: config.past_days,
        }
    }

    fn forecast_url(&self, at: Coordinate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&hourly=temperature_2m,precipitation&timezone=UTC&past_days={}&forecast_days=1",
            self.base_url,
            at.latitude(),
            at.longitude(),
            self.past_days
        )
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = at.latitude(), lon = at.longitude()))]
    async fn hourly_history(&self, at: Coordinate) -> Result<WeatherSeries> {
        let url = self.forecast_url(at);
        debug!("OpenMeteo API request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                error!("Weather request failed: {}", e);
                GlofError::from_transport(UPSTREAM, e)
            })?;

        let forecast: ForecastResponse = response.json().await.map_err(|e| {
            error!("Failed to parse weather response: {}", e);
            GlofError::from_transport(UPSTREAM, e)
        })?;

        let total_duration = start_time.elapsed();
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow weather API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        let series = series_from_response(forecast, Utc::now())?;
        info!(
            "Retrieved {} hourly weather samples in {:.3}s",
            series.len(),
            total_duration.as_secs_f64()
        );
        Ok(series)
    }
}

/// Forecast response from `OpenMeteo`, reduced to the fields we request
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub hourly: Option<HourlyData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HourlyData {
    pub time: Option<Vec<String>>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<Vec<Option<f64>>>,
    pub precipitation: Option<Vec<Option<f64>>>,
}

/// Convert a forecast response into a series ending at or before `now`.
///
/// Missing arrays and null entries are malformed; nothing is defaulted.
pub(crate) fn series_from_response(
    response: ForecastResponse,
    now: DateTime<Utc>,
) -> Result<WeatherSeries> {
    let hourly = response
        .hourly
        .ok_or_else(|| GlofError::malformed_response(UPSTREAM, "missing hourly block"))?;

    let precipitation = complete_values(hourly.precipitation, "precipitation")?;
    let temperature = complete_values(hourly.temperature, "temperature_2m")?;

    if precipitation.len() != temperature.len() {
        return Err(GlofError::malformed_response(
            UPSTREAM,
            format!(
                "precipitation and temperature lengths differ ({} vs {})",
                precipitation.len(),
                temperature.len()
            ),
        ));
    }

    let observed = match hourly.time {
        Some(times) if times.len() != precipitation.len() => {
            return Err(GlofError::malformed_response(
                UPSTREAM,
                format!(
                    "hourly.time length differs from values ({} vs {})",
                    times.len(),
                    precipitation.len()
                ),
            ));
        }
        Some(times) => observed_hours(&times, now)?,
        None => precipitation.len(),
    };

    WeatherSeries::new(
        precipitation[..observed].to_vec(),
        temperature[..observed].to_vec(),
    )
}

fn complete_values(values: Option<Vec<Option<f64>>>, field: &str) -> Result<Vec<f64>> {
    let values = values.ok_or_else(|| {
        GlofError::malformed_response(UPSTREAM, format!("missing hourly.{field}"))
    })?;

    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or_else(|| {
                GlofError::malformed_response(UPSTREAM, format!("null hourly.{field}[{i}]"))
            })
        })
        .collect()
}

/// Count of leading timestamps not after `now`; timestamps are ascending.
fn observed_hours(times: &[String], now: DateTime<Utc>) -> Result<usize> {
    let parsed = times
        .iter()
        .map(|t| {
            NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M")
                .map(|dt| dt.and_utc())
                .map_err(|e| {
                    GlofError::malformed_response(UPSTREAM, format!("bad timestamp '{t}': {e}"))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parsed.partition_point(|t| *t <= now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, response::Html, routing::get};
    use chrono::TimeZone;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ForecastResponse {
        serde_json::from_value(value).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 2, 30, 0).unwrap()
    }

    #[test]
    fn test_drops_forecast_hours() {
        let response = parse(json!({
            "latitude": 27.9,
            "longitude": 86.9,
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00", "2024-06-01T02:00", "2024-06-01T03:00"],
                "temperature_2m": [1.0, 2.0, 3.0, 4.0],
                "precipitation": [0.0, 0.5, 1.0, 9.0]
            }
        }));

        let series = series_from_response(response, now()).unwrap();
        assert_eq!(series.precipitation(), &[0.0, 0.5, 1.0]);
        assert_eq!(series.temperature(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_without_time_keeps_everything() {
        let response = parse(json!({
            "hourly": {
                "temperature_2m": [1.0, 2.0],
                "precipitation": [0.0, 0.5]
            }
        }));

        let series = series_from_response(response, now()).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_misaligned_time_is_malformed() {
        let response = parse(json!({
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00", "2024-06-01T02:00"],
                "temperature_2m": [1.0, 2.0, 3.0, 4.0],
                "precipitation": [0.0, 0.5, 1.0, 9.0]
            }
        }));

        let err = series_from_response(response, now()).unwrap_err();
        assert!(matches!(err, GlofError::MalformedResponse { .. }));
        assert!(err.to_string().contains("hourly.time length differs"));
    }

    #[test]
    fn test_missing_precipitation_is_malformed() {
        let response = parse(json!({
            "hourly": {
                "time": ["2024-06-01T00:00"],
                "temperature_2m": [1.0]
            }
        }));

        let err = series_from_response(response, now()).unwrap_err();
        assert!(matches!(err, GlofError::MalformedResponse { .. }));
        assert!(err.to_string().contains("precipitation"));
    }

    #[test]
    fn test_missing_hourly_block_is_malformed() {
        let response = parse(json!({ "error": true, "reason": "bad request" }));
        let err = series_from_response(response, now()).unwrap_err();
        assert!(matches!(err, GlofError::MalformedResponse { .. }));
    }

    #[test]
    fn test_null_sample_is_malformed() {
        let response = parse(json!({
            "hourly": {
                "temperature_2m": [1.0, null],
                "precipitation": [0.0, 0.5]
            }
        }));

        let err = series_from_response(response, now()).unwrap_err();
        assert!(err.to_string().contains("temperature_2m[1]"));
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let response = parse(json!({
            "hourly": {
                "temperature_2m": [1.0, 2.0, 3.0],
                "precipitation": [0.0, 0.5]
            }
        }));

        let err = series_from_response(response, now()).unwrap_err();
        assert!(matches!(err, GlofError::MalformedResponse { .. }));
    }

    #[test]
    fn test_forecast_url() {
        let config = WeatherConfig {
            base_url: "https://api.open-meteo.com/v1/".to_string(),
            timeout_seconds: 20,
            past_days: 7,
        };
        let client = OpenMeteoClient::new(Client::new(), &config);
        let url = client.forecast_url(Coordinate::new(27.5, 86.25).unwrap());
        assert_eq!(
            url,
            "https://api.open-meteo.com/v1/forecast?latitude=27.5&longitude=86.25&hourly=temperature_2m,precipitation&timezone=UTC&past_days=7&forecast_days=1"
        );
    }

    /// Serve canned upstream responses on an ephemeral local port
    async fn serve_upstream() -> String {
        let app = Router::new()
            .route(
                "/ok/forecast",
                get(|| async {
                    axum::Json(json!({
                        "hourly": {
                            "temperature_2m": [1.0, 2.0, 3.0],
                            "precipitation": [0.0, 0.2, 0.4]
                        }
                    }))
                }),
            )
            .route(
                "/s500/forecast",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/html/forecast",
                get(|| async { Html("<html><body>maintenance</body></html>") }),
            )
            .route(
                "/slow/forecast",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    axum::Json(json!({}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> OpenMeteoClient {
        let config = WeatherConfig {
            base_url,
            timeout_seconds: 1,
            past_days: 7,
        };
        OpenMeteoClient::new(Client::builder().no_proxy().build().unwrap(), &config)
    }

    async fn fetch(path: &str) -> Result<WeatherSeries> {
        let base = serve_upstream().await;
        client_for(format!("{base}/{path}"))
            .hourly_history(Coordinate::new(27.9, 86.9).unwrap())
            .await
    }

    #[tokio::test]
    async fn test_fetches_series_over_http() {
        let series = fetch("ok").await.unwrap();
        assert_eq!(series.precipitation(), &[0.0, 0.2, 0.4]);
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let err = fetch("s500").await.unwrap_err();
        assert_eq!(err.kind(), "upstream_unavailable");
    }

    #[tokio::test]
    async fn test_html_body_is_malformed() {
        let err = fetch("html").await.unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let err = fetch("slow").await.unwrap_err();
        assert_eq!(err.kind(), "upstream_unavailable");
    }
}
