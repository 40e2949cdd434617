//! Upstream dispatch.
//!
//! # Responsibilities
//! - Own the shared outbound HTTP client and the upstream configuration
//! - Construct the target URL (origin + API prefix + verbatim path + query)
//! - Execute the outbound request and decode the response body
//!
//! # Design Decisions
//! - Configuration is captured once at construction and never mutated
//! - The connect timeout is the only client-level knob; the total request
//!   timeout is enforced by the server's timeout layer

use axum::http::{header, HeaderMap, Method, StatusCode};

use crate::config::schema::{TimeoutConfig, UpstreamConfig};
use crate::relay::body::{self, OutboundBody, ResponseBody};
use crate::relay::error::RelayError;

/// Client for the upstream Sim AI service.
pub struct UpstreamClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

/// Decoded upstream response, ready for reconstruction.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl UpstreamClient {
    /// Create a new upstream client from validated configuration.
    pub fn new(config: UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(timeouts.connect_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Target URL: base origin + API prefix + `/` + path suffix, with the
    /// inbound query string appended verbatim when present.
    pub fn target_url(&self, path_suffix: &str, query: Option<&str>) -> String {
        let origin = self.config.base_url.trim_end_matches('/');
        let mut url = format!("{}{}/{}", origin, self.config.api_prefix, path_suffix);
        if let Some(query) = query {
            if !query.is_empty() {
                url.push('?');
                url.push_str(query);
            }
        }
        url
    }

    /// Execute the outbound request and decode the response body by its
    /// Content-Type.
    pub async fn dispatch(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: OutboundBody,
    ) -> Result<UpstreamResponse, RelayError> {
        let mut request = self.client.request(method, url);

        request = match body {
            OutboundBody::Json(value) => {
                let text = serde_json::to_string(&value).map_err(RelayError::JsonSerialize)?;
                request.headers(headers).body(text)
            }
            OutboundBody::Form(form) => {
                // The re-assembled form carries a fresh boundary; the original
                // Content-Type would contradict it.
                let mut headers = headers;
                headers.remove(header::CONTENT_TYPE);
                request.headers(headers).multipart(form)
            }
            OutboundBody::Text(text) => request.headers(headers).body(text),
            OutboundBody::Empty => request.headers(headers),
        };

        let response = request.send().await.map_err(RelayError::Upstream)?;

        let status = response.status();
        let headers = response.headers().clone();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        let bytes = response.bytes().await.map_err(RelayError::UpstreamBody)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body: body::decode_response(&content_type, bytes)?,
        })
    }
}
