//! Analysis service: fetches files from storage, counts them and renders word clouds.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::analysis_router;
use textcloud_core::{AnalysisConfig, AnalysisOrchestrator, HttpRenderer, StorageClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("textcloud=info".parse()?)
                .add_directive("api_grpc=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AnalysisConfig::from_env()?;
    let storage = StorageClient::connect_lazy(&config.storage_addr, config.max_upload_bytes)?;
    let renderer = HttpRenderer::new(config.renderer_url.clone(), config.renderer_timeout)?;
    let orchestrator = AnalysisOrchestrator::new(storage, renderer, config.storage_fetch_timeout);

    tracing::info!(
        "-- Starting Textcloud analysis on {} (storage {}, renderer {})",
        config.listen_addr,
        config.storage_addr,
        config.renderer_url
    );

    analysis_router(
        orchestrator,
        config.max_upload_bytes,
        config.enable_reflection,
    )?
    .serve(config.listen_addr)
    .await?;

    Ok(())
}
