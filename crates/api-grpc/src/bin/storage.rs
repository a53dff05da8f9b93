//! Storage service: owns the file directory and serves it over gRPC.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::storage_router;
use textcloud_core::{LocalFileStorage, StorageConfig};
use textcloud_files::FileStore;

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

    let config = StorageConfig::from_env()?;
    let store = FileStore::new(&config.storage_dir)?;
    tracing::info!(
        "-- Starting Textcloud storage on {} (dir {})",
        config.listen_addr,
        store.root_directory().display()
    );

    storage_router(
        LocalFileStorage::new(store),
        config.max_upload_bytes,
        config.enable_reflection,
    )?
    .serve(config.listen_addr)
    .await?;

    Ok(())
}
