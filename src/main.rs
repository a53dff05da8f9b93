use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::{analysis_router, storage_router};
use api_rest::{router, shutdown_signal, AppState};
use textcloud_core::{
    AnalysisClient, AnalysisConfig, AnalysisOrchestrator, GatewayConfig, HttpRenderer,
    LocalFileStorage, StorageClient, StorageConfig,
};
use textcloud_files::FileStore;

/// Main entry point for the Textcloud application
///
/// Starts all three services concurrently in one process:
/// - storage gRPC server on port 50051 (configurable via FILE_STORAGE_LISTEN_ADDR)
/// - analysis gRPC server on port 50052 (configurable via ANALYSIS_LISTEN_ADDR)
/// - HTTP gateway on port 8000 (configurable via GATEWAY_ADDR)
///
/// The services still talk to each other over gRPC, through FILE_STORAGE_ADDR and
/// ANALYSIS_ADDR, exactly as they do when deployed separately.
///
/// # Returns
/// * `Ok(())` - If the servers run and shut down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or a server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("textcloud=info".parse()?)
                .add_directive("api_grpc=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage_cfg = StorageConfig::from_env()?;
    let analysis_cfg = AnalysisConfig::from_env()?;
    let gateway_cfg = GatewayConfig::from_env()?;

    tracing::info!("++ Starting Textcloud storage on {}", storage_cfg.listen_addr);
    tracing::info!("++ Starting Textcloud analysis on {}", analysis_cfg.listen_addr);
    tracing::info!("++ Starting Textcloud gateway on {}", gateway_cfg.listen_addr);

    // Storage
    let store = FileStore::new(&storage_cfg.storage_dir)?;
    let storage_server = storage_router(
        LocalFileStorage::new(store),
        storage_cfg.max_upload_bytes,
        storage_cfg.enable_reflection,
    )?
    .serve_with_shutdown(storage_cfg.listen_addr, shutdown_signal());

    // Analysis
    let orchestrator = AnalysisOrchestrator::new(
        StorageClient::connect_lazy(&analysis_cfg.storage_addr, analysis_cfg.max_upload_bytes)?,
        HttpRenderer::new(analysis_cfg.renderer_url.clone(), analysis_cfg.renderer_timeout)?,
        analysis_cfg.storage_fetch_timeout,
    );
    let analysis_server = analysis_router(
        orchestrator,
        analysis_cfg.max_upload_bytes,
        analysis_cfg.enable_reflection,
    )?
    .serve_with_shutdown(analysis_cfg.listen_addr, shutdown_signal());

    // Gateway
    let state = AppState::new(
        Arc::new(StorageClient::connect_lazy(
            &gateway_cfg.storage_addr,
            gateway_cfg.max_upload_bytes,
        )?),
        Arc::new(AnalysisClient::connect_lazy(
            &gateway_cfg.analysis_addr,
            gateway_cfg.max_upload_bytes,
        )?),
    )
    .with_budgets(gateway_cfg.budgets);
    let app = router(state, gateway_cfg.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(gateway_cfg.listen_addr).await?;
    let gateway_server = async {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    };

    // Run all three
    let (storage_result, analysis_result, gateway_result) =
        tokio::join!(storage_server, analysis_server, gateway_server);
    storage_result.map_err(anyhow::Error::from)?;
    analysis_result.map_err(anyhow::Error::from)?;
    gateway_result.map_err(anyhow::Error::from)?;

    Ok(())
}
