use async_trait::async_trait;

use crate::Result;
use crate::models::{Coordinate, WeatherSeries};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Source of trailing hourly weather history
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Hourly precipitation and temperature covering at least the last
    /// seven days, UTC-aligned, most recent sample last.
    async fn hourly_history(&self, at: Coordinate) -> Result<WeatherSeries>;
}
