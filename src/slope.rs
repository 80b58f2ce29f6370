//! Terrain slope from four elevation samples around a point
//!
//! Samples are taken `offset` degrees north, south, east and west of the
//! target. Run is converted to meters with a flat-earth factor
//! (`meters_per_degree`), which is reasonable near mid-latitudes and
//! overstates east-west run towards the poles.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::Result;
use crate::config::SlopeConfig;
use crate::elevation::ElevationSource;
use crate::models::{Coordinate, SlopeEstimate};

/// Default sampling offset in degrees
pub const DEFAULT_OFFSET_DEGREES: f64 = 0.001;
/// Approximate meters per degree of latitude
pub const METERS_PER_DEGREE: f64 = 111_000.0;

pub struct SlopeEstimator {
    source: Arc<dyn ElevationSource>,
    offset_degrees: f64,
    meters_per_degree: f64,
}

impl SlopeEstimator {
    /// Estimator with the default offset and meters-per-degree factor
    pub fn new(source: Arc<dyn ElevationSource>) -> Self {
        Self {
            source,
            offset_degrees: DEFAULT_OFFSET_DEGREES,
            meters_per_degree: METERS_PER_DEGREE,
        }
    }

    pub fn from_config(source: Arc<dyn ElevationSource>, config: &SlopeConfig) -> Self {
        Self {
            source,
            offset_degrees: config.offset_degrees,
            meters_per_degree: config.meters_per_degree,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset_degrees: f64) -> Self {
        self.offset_degrees = offset_degrees;
        self
    }

    /// Sample the four neighbours concurrently and reduce them.
    ///
    /// Any failed lookup fails the whole estimate.
    #[instrument(skip(self), fields(lat = at.latitude(), lon = at.longitude()))]
    pub async fn estimate(&self, at: Coordinate) -> Result<SlopeEstimate> {
        let d = self.offset_degrees;
        let (north, south, east, west) = futures::try_join!(
            self.source.elevation(at.offset(d, 0.0)),
            self.source.elevation(at.offset(-d, 0.0)),
            self.source.elevation(at.offset(0.0, d)),
            self.source.elevation(at.offset(0.0, -d)),
        )?;

        let estimate = slope_from_samples(
            [north.meters, south.meters, east.meters, west.meters],
            d,
            self.meters_per_degree,
        );
        debug!(
            "Slope {:.4} m/m, mean elevation {:.1} m",
            estimate.slope, estimate.elevation_mean
        );
        Ok(estimate)
    }
}

/// Reduce `[north, south, east, west]` elevations to a slope estimate.
///
/// The steeper of the two axes wins; the mean is over all four samples.
#[must_use]
pub fn slope_from_samples(
    samples: [f64; 4],
    offset_degrees: f64,
    meters_per_degree: f64,
) -> SlopeEstimate {
    let [north, south, east, west] = samples;
    let rise = (north - south).abs().max((east - west).abs());
    let run = offset_degrees * meters_per_degree;

    SlopeEstimate {
        slope: rise / run,
        elevation_mean: samples.iter().sum::<f64>() / samples.len() as f64,
    }
}
