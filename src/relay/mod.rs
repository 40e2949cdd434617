//! Reverse-proxy relay subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request at /api/sim-ai/{*path}
//!     → headers.rs (forward minus host/content-length, inject trust headers,
//!       cookie → bearer token)
//!     → body.rs (content-type-driven request codec: JSON / multipart / text)
//!     → client.rs (target URL, dispatch, content-type-driven response decode)
//!     → response header filtering + reconstruction
//!     → Send to caller
//! ```
//!
//! # Design Decisions
//! - One linear pass per call; a single failure branch collapses every local
//!   error into the fixed 500 JSON shape (error.rs)
//! - Upstream non-2xx responses pass through verbatim, never remapped
//! - No state survives a call: no cache, no session, no retries

pub mod body;
pub mod client;
pub mod error;
pub mod headers;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, Response},
    response::IntoResponse,
};

use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::relay::body::{OutboundBody, ResponseBody};
use crate::relay::client::{UpstreamClient, UpstreamResponse};
use crate::relay::error::RelayError;

/// Mount point for the relay; everything after it is the upstream path suffix.
pub const MOUNT_PATH: &str = "/api/sim-ai";

/// Application state injected into the relay handler.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

/// Main relay handler.
/// Rebuilds the inbound request against the upstream origin and relays the
/// upstream response back with status, headers, and body preserved.
pub async fn relay_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response<Body> {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method_str = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method_str,
        path = %path,
        "Relaying request"
    );

    match relay(&state, request).await {
        Ok(response) => {
            metrics::record_request(&method_str, response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method_str,
                path = %path,
                error = %e,
                "Relay failed"
            );
            metrics::record_request(&method_str, 500, start_time);
            e.into_response()
        }
    }
}

/// The relay pipeline. Any error here is converted into the fixed 500 shape
/// by the caller.
async fn relay(state: &AppState, request: Request<Body>) -> Result<Response<Body>, RelayError> {
    let method = request.method().clone();
    let suffix = path_suffix(request.uri().path());
    let query = request.uri().query().map(str::to_owned);
    let target_url = state.upstream.target_url(suffix, query.as_deref());

    // Outbound header set: everything except host/content-length, plus the
    // trust headers and the cookie-derived bearer token.
    let inbound_headers = request.headers().clone();
    let mut outbound_headers = headers::forward_headers(&inbound_headers);
    headers::inject_trust_headers(&mut outbound_headers, &inbound_headers);
    if let Some(bearer) = headers::bearer_from_cookies(&inbound_headers) {
        outbound_headers.insert(header::AUTHORIZATION, bearer);
    }

    let outbound_body = if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
        body::outbound_body(request).await?
    } else {
        OutboundBody::Empty
    };

    let upstream = state
        .upstream
        .dispatch(method, &target_url, outbound_headers, outbound_body)
        .await?;

    build_response(upstream)
}

/// Everything after the mount point, preserved verbatim (no percent-decoding).
fn path_suffix(path: &str) -> &str {
    path.strip_prefix(MOUNT_PATH)
        .map(|rest| rest.trim_start_matches('/'))
        .unwrap_or("")
}

/// Rebuild the caller-facing response from the decoded upstream response.
fn build_response(upstream: UpstreamResponse) -> Result<Response<Body>, RelayError> {
    let mut builder = Response::builder().status(upstream.status);
    if let Some(headers) = builder.headers_mut() {
        *headers = headers::filter_response_headers(&upstream.headers);
    }

    let body = match upstream.body {
        ResponseBody::Binary(bytes) => Body::from(bytes),
        ResponseBody::Text(text) => Body::from(text),
        ResponseBody::Json(value) => {
            Body::from(serde_json::to_vec(&value).map_err(RelayError::JsonSerialize)?)
        }
    };

    builder
        .body(body)
        .map_err(|e| RelayError::ResponseBuild(e.to_string()))
}
