//! Elevation client for the Open-Elevation lookup API

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use super::ElevationSource;
use crate::config::ElevationConfig;
use crate::models::{Coordinate, ElevationSample};
use crate::{GlofError, Result};

const UPSTREAM: &str = "elevation";

pub struct OpenElevationClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenElevationClient {
    #[must_use]
    pub fn new(client: Client, config: &ElevationConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds.into()),
        }
    }

    fn lookup_url(&self, at: Coordinate) -> String {
        format!(
            "{}/lookup?locations={},{}",
            self.base_url,
            at.latitude(),
            at.longitude()
        )
    }
}

#[async_trait]
impl ElevationSource for OpenElevationClient {
    #[instrument(skip(self), fields(lat = at.latitude(), lon = at.longitude()))]
    async fn elevation(&self, at: Coordinate) -> Result<ElevationSample> {
        let url = self.lookup_url(at);
        debug!("Open-Elevation request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                error!("Elevation request failed: {}", e);
                GlofError::from_transport(UPSTREAM, e)
            })?;

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| GlofError::from_transport(UPSTREAM, e))?;

        let duration = start_time.elapsed();
        if duration.as_secs() > 5 {
            warn!("Slow elevation API response: {:.3}s", duration.as_secs_f64());
        }

        sample_from_response(lookup)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse {
    pub results: Option<Vec<LookupResult>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupResult {
    pub elevation: Option<f64>,
}

pub(crate) fn sample_from_response(response: LookupResponse) -> Result<ElevationSample> {
    response
        .results
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|result| result.elevation)
        .map(ElevationSample::new)
        .ok_or_else(|| GlofError::malformed_response(UPSTREAM, "no elevation result in payload"))
}
