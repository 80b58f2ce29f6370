//! Error types and handling for `GlofWatch`

use thiserror::Error;

/// Main error type for the `GlofWatch` service
///
/// Every prediction failure is request-scoped: nothing here is fatal to the
/// process and nothing is retried.
#[derive(Error, Debug)]
pub enum GlofError {
    /// Network or timeout failure talking to an upstream data source
    #[error("{upstream} unavailable: {message}")]
    UpstreamUnavailable {
        upstream: &'static str,
        message: String,
    },

    /// Upstream replied but without the expected fields
    #[error("Malformed response from {upstream}: {message}")]
    MalformedResponse {
        upstream: &'static str,
        message: String,
    },

    /// Not enough hourly weather samples to build the feature window
    #[error("Insufficient data: need {required} hourly samples, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl GlofError {
    /// Create a new upstream-unavailable error
    pub fn upstream_unavailable<S: Into<String>>(upstream: &'static str, message: S) -> Self {
        Self::UpstreamUnavailable {
            upstream,
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed_response<S: Into<String>>(upstream: &'static str, message: S) -> Self {
        Self::MalformedResponse {
            upstream,
            message: message.into(),
        }
    }

    /// Create a new input validation error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify a transport error from `reqwest`.
    ///
    /// Connection, timeout and status errors mean the upstream is unavailable;
    /// a body that cannot be decoded means it answered with the wrong shape.
    pub(crate) fn from_transport(upstream: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() && !err.is_timeout() {
            Self::malformed_response(upstream, err.to_string())
        } else {
            Self::upstream_unavailable(upstream, err.to_string())
        }
    }

    /// Stable machine-readable tag for this error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GlofError::UpstreamUnavailable { .. } => "upstream_unavailable",
            GlofError::MalformedResponse { .. } => "malformed_response",
            GlofError::InsufficientData { .. } => "insufficient_data",
            GlofError::InvalidInput { .. } => "invalid_input",
            GlofError::Config { .. } => "config",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GlofError::UpstreamUnavailable { upstream, .. } => {
                format!("Unable to reach the {upstream} service. Please try again later.")
            }
            GlofError::MalformedResponse { upstream, .. } => {
                format!("The {upstream} service returned incomplete data.")
            }
            GlofError::InsufficientData {
                required,
                available,
            } => format!(
                "Not enough weather history for this location ({available} of {required} hourly samples)."
            ),
            GlofError::InvalidInput { message } => format!("Invalid input: {message}"),
            GlofError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}
