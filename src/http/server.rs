//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay mounted at its wildcard path
//! - Wire up middleware (timeout, request ID, tracing)
//! - Bind server to listener
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::http::request::RequestIdLayer;
use crate::relay::client::UpstreamClient;
use crate::relay::{relay_handler, AppState, MOUNT_PATH};

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let upstream = Arc::new(UpstreamClient::new(
            config.upstream.clone(),
            &config.timeouts,
        )?);
        let state = AppState { upstream };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Only GET, POST, PUT, DELETE, and PATCH are registered; other methods
    /// have no handler and are answered by Axum itself.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let relay_routes = get(relay_handler)
            .post(relay_handler)
            .put(relay_handler)
            .delete(relay_handler)
            .patch(relay_handler);

        Router::new()
            .route(&format!("{}/{{*path}}", MOUNT_PATH), relay_routes)
            .with_state(state)
            // The relay forwards bodies of any size; the upstream enforces
            // its own limits.
            .layer(DefaultBodyLimit::disable())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
