//! Application setup and server configuration.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use log::info;

use crate::config::{CredentialSource, RedditEndpoints};
use crate::server::middleware::log_requests;
use crate::server::routes::{health_handler, post_handler};

/// Shared application state.
///
/// Holds configuration only; every request builds its own Reddit client.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialSource>,
    pub endpoints: RedditEndpoints,
}

impl AppState {
    pub fn new(credentials: Arc<dyn CredentialSource>, endpoints: RedditEndpoints) -> Self {
        Self {
            credentials,
            endpoints,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/post", post(post_handler))
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}

/// Bind to `host:port` and serve until the process is stopped
pub async fn serve(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Starting server on {}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, build_app(state))
        .await
        .context("Server error")?;

    Ok(())
}
