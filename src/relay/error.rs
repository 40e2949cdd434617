//! Relay error types and response conversion.
//!
//! Every failure between receiving a call and relaying the upstream response
//! collapses into one fixed-shape 500 response. Upstream non-2xx statuses are
//! not errors; they pass through untouched.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Fixed error message returned for every relay-local failure.
pub const RELAY_ERROR_MESSAGE: &str = "Failed to proxy request to SIM AI";

/// Errors that can occur while relaying a request.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("invalid JSON request body: {0}")]
    RequestJson(#[source] serde_json::Error),

    #[error("invalid multipart body: {0}")]
    Multipart(String),

    #[error("failed to serialize JSON body: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("failed to read upstream body: {0}")]
    UpstreamBody(#[source] reqwest::Error),

    #[error("invalid JSON in upstream response: {0}")]
    ResponseJson(#[source] serde_json::Error),

    #[error("failed to build response: {0}")]
    ResponseBuild(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let details = self.to_string();
        let body = Json(serde_json::json!({
            "error": RELAY_ERROR_MESSAGE,
            "details": details,
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
