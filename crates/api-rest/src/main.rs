//! Gateway binary.
//!
//! ## Purpose
//! Runs the public HTTP gateway on its own, talking to the storage and analysis services over
//! gRPC. The workspace's `textcloud-run` binary runs all three services in one process instead.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use textcloud_core::{AnalysisClient, GatewayConfig, StorageClient};

/// Main entry point for the Textcloud gateway
///
/// # Errors
/// Returns an error if:
/// - the configuration in the environment is invalid,
/// - the listen address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;
    let storage = StorageClient::connect_lazy(&config.storage_addr, config.max_upload_bytes)?;
    let analysis = AnalysisClient::connect_lazy(&config.analysis_addr, config.max_upload_bytes)?;

    let state =
        AppState::new(Arc::new(storage), Arc::new(analysis)).with_budgets(config.budgets);
    let app = router(state, config.max_upload_bytes);

    tracing::info!(
        "-- Starting Textcloud gateway on {} (storage {}, analysis {})",
        config.listen_addr,
        config.storage_addr,
        config.analysis_addr
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(api_rest::shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}
