use async_trait::async_trait;

use crate::Result;
use crate::models::{Coordinate, ElevationSample};

pub mod open_elevation;

pub use open_elevation::OpenElevationClient;

/// Point elevation lookup
#[async_trait]
pub trait ElevationSource: Send + Sync {
    async fn elevation(&self, at: Coordinate) -> Result<ElevationSample>;
}
