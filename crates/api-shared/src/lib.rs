//! # API Shared
//!
//! Shared definitions for the Textcloud services.
//!
//! Contains:
//! - Protobuf-generated messages, servers and clients (`pb` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-grpc`, `api-rest` and the RPC client adapters in `textcloud-core`.

// Re-export the generated protobuf module. The generated code will be placed
// into OUT_DIR at build time by the build script.
pub mod pb {
    tonic::include_proto!("textcloud.v1");
}

pub mod health;

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

pub use health::HealthService;
pub use pb::*;
