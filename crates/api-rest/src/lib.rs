//! # API REST
//!
//! Public HTTP gateway for Textcloud.
//!
//! Handles:
//! - HTTP endpoints with axum (upload, download, analyze, word cloud, health)
//! - per-route deadlines on every backend call
//! - translating backend failures into each route's fixed status code
//! - REST-specific concerns (multipart, JSON, CORS, body limits)
//!
//! Backends are reached only through the `FileStorage` and `TextAnalysis` traits, so the same
//! router runs against gRPC clients in production and against in-memory doubles in tests.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

pub use error::{ApiError, ErrorBody};

use api_shared::HealthService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use textcloud_core::constants::MESSAGE_OVERHEAD_BYTES;
use textcloud_core::{FileStorage, RouteBudgets, TextAnalysis};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across gateway handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn FileStorage>,
    pub analysis: Arc<dyn TextAnalysis>,
    pub budgets: RouteBudgets,
    pub health: HealthService,
}

impl AppState {
    pub fn new(storage: Arc<dyn FileStorage>, analysis: Arc<dyn TextAnalysis>) -> Self {
        Self {
            storage,
            analysis,
            budgets: RouteBudgets::default(),
            health: HealthService::new("gateway"),
        }
    }

    pub fn with_budgets(mut self, budgets: RouteBudgets) -> Self {
        self.budgets = budgets;
        self
    }
}

/// Builds the gateway router.
///
/// Request bodies are capped a little above `max_upload_bytes` to leave room for multipart
/// framing.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/file/:id", get(handlers::download))
        .route("/analyze/:id", post(handlers::analyze))
        .route("/wordcloud/:id", get(handlers::word_cloud))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MESSAGE_OVERHEAD_BYTES),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
///
/// In-flight requests are allowed to finish once this resolves.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
