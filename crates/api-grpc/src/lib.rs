//! # API gRPC
//!
//! gRPC servers for the Textcloud backends.
//!
//! Handles:
//! - the storage service, wrapping any `FileStorage`
//! - the analysis service, wrapping any `TextAnalysis`
//! - gRPC-specific concerns (deadlines, message limits, reflection)
//!
//! Business logic lives in `textcloud-core`; this crate only adapts it to tonic.

#![warn(rust_2018_idioms)]

pub mod analysis;
pub mod deadline;
pub mod storage;

pub use analysis::AnalysisGrpcService;
pub use api_shared::pb;
pub use storage::StorageGrpcService;

use api_shared::pb::analysis_server::AnalysisServer;
use api_shared::pb::file_storage_server::FileStorageServer;
use api_shared::FILE_DESCRIPTOR_SET;
use textcloud_core::constants::MESSAGE_OVERHEAD_BYTES;
use textcloud_core::{FileStorage, TextAnalysis};
use tonic::transport::server::Router;
use tonic::transport::Server;

/// Builds the storage server, ready for `serve` or `serve_with_incoming`.
///
/// `max_upload_bytes` bounds the file content in either direction.
pub fn storage_router<S>(
    storage: S,
    max_upload_bytes: usize,
    enable_reflection: bool,
) -> anyhow::Result<Router>
where
    S: FileStorage + 'static,
{
    let limit = max_upload_bytes.saturating_add(MESSAGE_OVERHEAD_BYTES);
    let svc = FileStorageServer::new(StorageGrpcService::new(storage))
        .max_decoding_message_size(limit)
        .max_encoding_message_size(limit);

    let router = server_builder().add_service(svc);
    with_reflection(router, enable_reflection)
}

/// Builds the analysis server, ready for `serve` or `serve_with_incoming`.
///
/// `max_image_bytes` bounds rendered images sent back to callers.
pub fn analysis_router<A>(
    analysis: A,
    max_image_bytes: usize,
    enable_reflection: bool,
) -> anyhow::Result<Router>
where
    A: TextAnalysis + 'static,
{
    let svc = AnalysisServer::new(AnalysisGrpcService::new(analysis))
        .max_encoding_message_size(max_image_bytes.saturating_add(MESSAGE_OVERHEAD_BYTES));

    let router = server_builder().add_service(svc);
    with_reflection(router, enable_reflection)
}

fn server_builder() -> Server {
    Server::builder().trace_fn(|req| tracing::info_span!("grpc", path = %req.uri().path()))
}

fn with_reflection(router: Router, enable: bool) -> anyhow::Result<Router> {
    if !enable {
        tracing::info!("gRPC server reflection disabled");
        return Ok(router);
    }

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;
    tracing::info!("gRPC server reflection enabled");
    Ok(router.add_service(reflection_service))
}
