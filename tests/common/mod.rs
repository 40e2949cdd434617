//! Shared utilities for integration testing.
//!
//! Spawns a mock Sim AI upstream and a relay instance on ephemeral ports.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use voicecake_relay::{HttpServer, RelayConfig};

/// Binary payload served by the mock upstream's /api/bin route.
pub const BINARY_PAYLOAD: &[u8] = &[0x00, 0x9f, 0x92, 0x96, 0xff, 0x00, 0x42];

/// Start a mock upstream that echoes request details as JSON.
///
/// Routes (all under /api, mirroring the upstream's fixed prefix):
/// - `/api/bin`: application/octet-stream payload
/// - `/api/text`: text/plain body
/// - `/api/missing`: 404 with a JSON error body
/// - `/api/count`: increments a counter per call, proving no cross-call cache
/// - `/api/compressed`: serves a deflate body only when the request advertises
///   deflate support, plain JSON otherwise
/// - everything else: JSON echo of method, path, query, headers, body
pub async fn start_mock_upstream() -> SocketAddr {
    let counter = Arc::new(AtomicU64::new(0));

    let app = Router::new()
        .route("/api/bin", any(binary_handler))
        .route("/api/text", any(text_handler))
        .route("/api/missing", any(missing_handler))
        .route("/api/count", any(count_handler))
        .route("/api/compressed", any(compressed_handler))
        .route("/api/{*path}", any(echo_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(counter);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn binary_handler() -> Response {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Bytes::from_static(BINARY_PAYLOAD),
    )
        .into_response()
}

async fn text_handler() -> Response {
    ([(header::CONTENT_TYPE, "text/plain")], "hello from upstream").into_response()
}

async fn missing_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "not found"})),
    )
        .into_response()
}

async fn compressed_handler(request: Request) -> Response {
    let accepts_deflate = request
        .headers()
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("deflate"));

    if accepts_deflate {
        // An upstream honoring deflate would send bytes the relay cannot
        // decode; any opaque payload stands in for the compressed stream.
        return (
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CONTENT_ENCODING, "deflate"),
            ],
            Bytes::from_static(&[0x78, 0x9c, 0x01, 0x02, 0x03]),
        )
            .into_response();
    }
    Json(json!({"ok": true})).into_response()
}

async fn count_handler(State(counter): State<Arc<AtomicU64>>) -> Json<serde_json::Value> {
    let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "count": count }))
}

async fn echo_handler(request: Request) -> Json<serde_json::Value> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_owned);

    let mut headers = serde_json::Map::new();
    for (name, value) in request.headers() {
        headers.insert(
            name.as_str().to_string(),
            json!(String::from_utf8_lossy(value.as_bytes())),
        );
    }

    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    Json(json!({
        "method": method,
        "path": path,
        "query": query,
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Start a relay pointed at the given upstream, returning its address.
pub async fn start_relay(upstream_addr: SocketAddr) -> SocketAddr {
    start_relay_at(&format!("http://{}", upstream_addr)).await
}

/// Start a relay against an arbitrary upstream origin (possibly unreachable).
pub async fn start_relay_at(upstream_url: &str) -> SocketAddr {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream_url.to_string();
    config.observability.metrics_enabled = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        // Keep the sender alive for the lifetime of the test process.
        let _tx = _shutdown_tx;
        let _ = server.run(listener, shutdown_rx).await;
    });

    addr
}

/// Non-pooled client so each test call is an independent connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
