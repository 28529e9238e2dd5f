//! Error types for the contact sync pipeline.
//!
//! # Design
//! `ApiError` is the closed taxonomy for non-2xx HTTP responses. The variant
//! is selected by exact status match: 400, 401, 404 and 500 get dedicated
//! variants, every other status lands in `Unknown` with the real code kept.
//! Each variant carries the parsed response body.
//!
//! `SyncError` is what every pipeline operation returns. API failures are
//! wrapped transparently; the remaining variants are local failures that never
//! carry an HTTP status.

use serde_json::Value;
use thiserror::Error;

/// A non-2xx response from GitHub or Freshdesk.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("API Error (400): {}", render_body(.body))]
    BadRequest { body: Value },

    #[error("API Error (401): {}", render_body(.body))]
    Unauthorized { body: Value },

    #[error("API Error (404): {}", render_body(.body))]
    NotFound { body: Value },

    #[error("API Error (500): {}", render_body(.body))]
    InternalServerError { body: Value },

    /// Any other non-2xx status, e.g. 403, 409, 418 or 502.
    #[error("API Error ({status}): {}", render_body(.body))]
    Unknown { status: u16, body: Value },
}

impl ApiError {
    /// Classify a failed response by its status code.
    pub fn from_status(status: u16, body: Value) -> Self {
        match status {
            400 => ApiError::BadRequest { body },
            401 => ApiError::Unauthorized { body },
            404 => ApiError::NotFound { body },
            500 => ApiError::InternalServerError { body },
            status => ApiError::Unknown { status, body },
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest { .. } => 400,
            ApiError::Unauthorized { .. } => 401,
            ApiError::NotFound { .. } => 404,
            ApiError::InternalServerError { .. } => 500,
            ApiError::Unknown { status, .. } => *status,
        }
    }

    pub fn body(&self) -> &Value {
        match self {
            ApiError::BadRequest { body }
            | ApiError::Unauthorized { body }
            | ApiError::NotFound { body }
            | ApiError::InternalServerError { body }
            | ApiError::Unknown { body, .. } => body,
        }
    }
}

/// Missing or empty credentials detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
}

/// Errors returned by the sync pipeline and its adapters.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The GitHub profile has no public email, so there is nothing to match on.
    #[error("GitHub user does not have a public email address")]
    MissingEmail,

    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A 2xx response body did not have the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SyncError {
    /// The single line reported to the user when a run fails.
    ///
    /// API errors render as `API Error (<status>): <body>`, everything else as
    /// `Error: <message>`.
    pub fn report_line(&self) -> String {
        match self {
            SyncError::Api(err) => err.to_string(),
            other => format!("Error: {other}"),
        }
    }
}

/// String bodies print without quotes; anything else as compact JSON.
fn render_body(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
