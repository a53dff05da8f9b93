//! Constants used throughout the Textcloud core crate.
//!
//! Defaults here are the values used when the corresponding environment variable is unset.

use std::time::Duration;

/// Deadline attached to the gateway's upload RPC.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline attached to the gateway's download RPC.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline attached to the gateway's analyze RPC.
pub const ANALYZE_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline attached to the gateway's word-cloud RPC.
pub const WORD_CLOUD_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect timeout for lazily established gRPC channels.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Image format requested from the word-cloud renderer.
pub const WORD_CLOUD_FORMAT: &str = "png";

/// Width in pixels of rendered word clouds.
pub const WORD_CLOUD_WIDTH: u32 = 800;

/// Height in pixels of rendered word clouds.
pub const WORD_CLOUD_HEIGHT: u32 = 800;

pub const DEFAULT_RENDERER_URL: &str = "https://quickchart.io/wordcloud";
pub const DEFAULT_RENDERER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_FETCH_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_STORAGE_LISTEN_ADDR: &str = "0.0.0.0:50051";
pub const DEFAULT_ANALYSIS_LISTEN_ADDR: &str = "0.0.0.0:50052";
pub const DEFAULT_GATEWAY_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_STORAGE_ADDR: &str = "http://localhost:50051";
pub const DEFAULT_ANALYSIS_ADDR: &str = "http://localhost:50052";

/// Upper bound for a single upload, applied to the HTTP body and to gRPC messages (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Extra room on gRPC messages for field framing around the file bytes.
pub const MESSAGE_OVERHEAD_BYTES: usize = 64 * 1024;
