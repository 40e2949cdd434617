//! Content-type-driven body codecs.
//!
//! # Responsibilities
//! - Classify inbound request bodies (JSON / multipart / raw text)
//! - Classify upstream response bodies (JSON / text / binary)
//! - Surface malformed JSON as a relay error instead of forwarding garbage
//!
//! # Design Decisions
//! - Closed tagged unions with an explicit fallback branch, so unanticipated
//!   content types degrade to verbatim pass-through rather than data loss
//! - JSON bodies are parsed and re-serialized: semantics preserved, formatting
//!   normalized, validation enforced at the relay boundary

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart},
    http::{header, HeaderMap, Request},
};

use crate::relay::error::RelayError;

/// Body forwarded to the upstream, selected by the inbound Content-Type.
#[derive(Debug)]
pub enum OutboundBody {
    /// `application/json`: parsed and re-serialized.
    Json(serde_json::Value),
    /// `multipart/form-data`: re-assembled part by part.
    Form(reqwest::multipart::Form),
    /// Everything else, forwarded verbatim.
    Text(String),
    /// GET/DELETE carry no body.
    Empty,
}

/// Upstream response body, selected by the upstream Content-Type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
    Binary(Bytes),
}

/// Lower-cased Content-Type value, or empty when absent.
fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Build the outbound body from a POST/PUT/PATCH request.
pub async fn outbound_body(request: Request<Body>) -> Result<OutboundBody, RelayError> {
    let content_type = content_type(request.headers());

    if content_type.contains("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| RelayError::Multipart(e.to_string()))?;
        return reassemble_form(multipart).await;
    }

    let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| RelayError::BodyRead(e.to_string()))?;

    if content_type.contains("application/json") {
        let value = serde_json::from_slice(&bytes).map_err(RelayError::RequestJson)?;
        return Ok(OutboundBody::Json(value));
    }

    Ok(OutboundBody::Text(
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

/// Rebuild a multipart form from the parsed inbound parts, preserving field
/// name, file name, and per-part content type.
async fn reassemble_form(mut multipart: Multipart) -> Result<OutboundBody, RelayError> {
    let mut form = reqwest::multipart::Form::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let part_content_type = field.content_type().map(str::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(|e| RelayError::Multipart(e.to_string()))?;

        let mut part = reqwest::multipart::Part::bytes(data.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(mime) = part_content_type {
            part = part
                .mime_str(&mime)
                .map_err(|e| RelayError::Multipart(e.to_string()))?;
        }
        form = form.part(name, part);
    }

    Ok(OutboundBody::Form(form))
}

/// Decode the upstream response body by its Content-Type.
pub fn decode_response(content_type: &str, bytes: Bytes) -> Result<ResponseBody, RelayError> {
    if content_type.contains("application/json") {
        let value = serde_json::from_slice(&bytes).map_err(RelayError::ResponseJson)?;
        return Ok(ResponseBody::Json(value));
    }
    if content_type.contains("text") {
        return Ok(ResponseBody::Text(
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
    }
    Ok(ResponseBody::Binary(bytes))
}
