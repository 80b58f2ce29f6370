//! HTTP request handling for predictions
//!
//! Responses are tagged by `status` so a success body can never be confused
//! with an error body:
//!
//! ```json
//! {"status":"ok","riskLevel":"High","score":7,"features":{...}}
//! {"status":"error","kind":"upstream_unavailable","message":"..."}
//! ```

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Coordinate, RiskResult};
use crate::predictor::Predictor;
use crate::{GlofError, VERSION};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub lat: f64,
    pub lon: f64,
    /// Percent change of lake area over its baseline; pass 0 when unknown
    #[serde(default)]
    pub area_change_pct: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionResponse {
    Ok(RiskResult),
    Error(ApiError),
}

impl From<&GlofError> for ApiError {
    fn from(err: &GlofError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.user_message(),
        }
    }
}

/// HTTP status for a failed prediction
#[must_use]
pub fn status_for(err: &GlofError) -> StatusCode {
    match err {
        GlofError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        GlofError::UpstreamUnavailable { .. } | GlofError::MalformedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
        GlofError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        GlofError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

pub fn router(predictor: Arc<Predictor>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(predictor)
}

fn failure(err: &GlofError) -> (StatusCode, Json<PredictionResponse>) {
    warn!("Prediction failed: {}", err);
    (
        status_for(err),
        Json(PredictionResponse::Error(ApiError::from(err))),
    )
}

async fn predict(
    State(predictor): State<Arc<Predictor>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> (StatusCode, Json<PredictionResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return failure(&GlofError::invalid_input(rejection.body_text())),
    };

    let coordinate = match Coordinate::new(request.lat, request.lon) {
        Ok(coordinate) => coordinate,
        Err(err) => return failure(&err),
    };

    match predictor.predict(coordinate, request.area_change_pct).await {
        Ok(result) => (StatusCode::OK, Json(PredictionResponse::Ok(result))),
        Err(err) => failure(&err),
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "glofwatch".to_string(),
        version: VERSION.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
