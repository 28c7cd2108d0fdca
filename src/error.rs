use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::AuditPass;

/// Failures that end a job before a summary can be produced.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to launch browser session: {0}")]
    SessionLaunch(String),

    #[error("failed to close browser session: {0}")]
    SessionClose(String),

    #[error("Lighthouse {pass} pass failed: {reason}")]
    Pass { pass: AuditPass, reason: String },

    #[error("Lighthouse {pass} pass timed out after {secs}s")]
    PassTimeout { pass: AuditPass, secs: u64 },

    #[error("Lighthouse {0} pass did not produce a report")]
    NoReport(AuditPass),

    #[error("audit task aborted: {0}")]
    Aborted(String),
}

/// Failures posting a payload to a result endpoint. Logged, never escalated.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("could not encode webhook payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook responded with {status}: {body}")]
    Status { status: u16, body: String },
}

/// Front-door validation failures, rendered as `400 {"error": ...}`.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("Missing required parameters: url and webhook.")]
    MissingParameters,

    #[error("Missing required parameter: url.")]
    MissingUrl,

    #[error("Invalid url parameter: {0}")]
    InvalidUrl(String),

    #[error("Invalid device parameter. Must be 'mobile' or 'desktop'.")]
    InvalidDevice,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
