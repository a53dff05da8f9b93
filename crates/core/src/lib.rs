//! # Textcloud Core
//!
//! Business logic shared by every Textcloud service:
//! - the text analyzer ([`analyze`])
//! - the capability traits [`FileStorage`], [`TextAnalysis`] and [`WordCloudRenderer`]
//! - the [`AnalysisOrchestrator`] that ties them together
//! - the HTTP word-cloud renderer and the gRPC client stubs
//! - startup configuration and the [`ServiceError`] taxonomy
//!
//! **No server concerns**: gRPC service implementations live in `api-grpc`, the HTTP gateway in
//! `api-rest`. This crate only defines what those servers call into.

pub mod analysis;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod orchestrator;
pub mod renderer;
pub mod storage;

pub use api_shared::pb;
pub use tonic::async_trait;

pub use analysis::{analyze, AnalysisResult};
pub use client::{AnalysisClient, StorageClient};
pub use config::{AnalysisConfig, GatewayConfig, RouteBudgets, StorageConfig};
pub use error::{ConfigError, ConfigResult, ServiceError, ServiceResult};
pub use orchestrator::{AnalysisOrchestrator, TextAnalysis, WordCloudImage};
pub use renderer::{HttpRenderer, RenderRequest, WordCloudRenderer};
pub use storage::{FileStorage, LocalFileStorage};
pub use textcloud_files::{FileId, StoredFile, UNKNOWN_FILENAME};
