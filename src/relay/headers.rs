//! Header forwarding and trust-context injection.
//!
//! # Responsibilities
//! - Copy inbound headers minus transport-specific ones (host, content-length,
//!   accept-encoding)
//! - Inject the proxied/auto-auth markers and the original Host value
//! - Derive the bearer token from the `auth-token` cookie
//! - Strip upstream transport-framing headers from the relayed response
//!
//! # Design Decisions
//! - The `http` HeaderMap stores names lower-cased, so the exclusion lists are
//!   case-insensitive without a separate lookup structure
//! - Multi-valued headers are forwarded with every value intact

use axum::http::{header, HeaderMap, HeaderValue};

/// Marker header identifying the call as proxied.
pub const X_PROXIED_REQUEST: &str = "x-proxied-request";

/// Marker header telling the upstream to perform automatic authentication.
pub const X_AUTO_AUTH: &str = "x-auto-auth";

/// Header carrying the inbound Host value so the upstream can build callback
/// URLs despite being addressed through the relay.
pub const X_ORIGINAL_HOST: &str = "x-original-host";

/// Cookie carrying the session token to promote into an Authorization header.
pub const AUTH_COOKIE: &str = "auth-token";

/// Request headers never forwarded; the outbound HTTP client recomputes them.
/// `accept-encoding` is included: the outbound client must advertise only the
/// codings it can decode, otherwise the upstream may compress with a coding
/// the relay cannot undo before re-serializing the body.
const SKIP_REQUEST_HEADERS: [&str; 3] = ["host", "content-length", "accept-encoding"];

/// Response headers never relayed; they describe the upstream transport
/// framing, which differs once the relay re-serializes the body.
const SKIP_RESPONSE_HEADERS: [&str; 3] = ["content-encoding", "content-length", "transfer-encoding"];

/// Copy every inbound header except the transport-specific ones.
pub fn forward_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if SKIP_REQUEST_HEADERS.contains(&name.as_str()) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }
    outbound
}

/// Set the three trust headers unconditionally.
pub fn inject_trust_headers(outbound: &mut HeaderMap, inbound: &HeaderMap) {
    outbound.insert(X_PROXIED_REQUEST, HeaderValue::from_static("true"));
    outbound.insert(X_AUTO_AUTH, HeaderValue::from_static("true"));

    let original_host = inbound
        .get(header::HOST)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("localhost"));
    outbound.insert(X_ORIGINAL_HOST, original_host);
}

/// Build `Bearer <token>` from the `auth-token` cookie, if present.
///
/// Returns None when the cookie is absent; the upstream then decides how to
/// treat the unauthenticated call.
pub fn bearer_from_cookies(inbound: &HeaderMap) -> Option<HeaderValue> {
    for cookie_header in inbound.get_all(header::COOKIE) {
        let Ok(cookies) = cookie_header.to_str() else {
            continue;
        };
        for pair in cookies.split(';') {
            if let Some(token) = pair
                .trim()
                .strip_prefix(AUTH_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
            {
                return HeaderValue::from_str(&format!("Bearer {}", token)).ok();
            }
        }
    }
    None
}

/// Copy upstream response headers minus the transport-framing ones.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if SKIP_RESPONSE_HEADERS.contains(&name.as_str()) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }
    outbound
}
