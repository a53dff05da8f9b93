//! Runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. Nothing in
//! request handling reads the process environment. Every `from_lookup` constructor takes the
//! variable source as a function so tests never have to mutate process-wide state.

use crate::constants::{
    ANALYZE_TIMEOUT, DEFAULT_ANALYSIS_ADDR, DEFAULT_ANALYSIS_LISTEN_ADDR, DEFAULT_GATEWAY_ADDR,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_RENDERER_TIMEOUT_SECS, DEFAULT_RENDERER_URL,
    DEFAULT_STORAGE_ADDR, DEFAULT_STORAGE_FETCH_TIMEOUT_SECS, DEFAULT_STORAGE_LISTEN_ADDR,
    DOWNLOAD_TIMEOUT, UPLOAD_TIMEOUT, WORD_CLOUD_TIMEOUT,
};
use crate::{ConfigError, ConfigResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use textcloud_files::DEFAULT_STORAGE_DIR;

pub const FILE_STORAGE_LISTEN_ADDR: &str = "FILE_STORAGE_LISTEN_ADDR";
pub const ANALYSIS_LISTEN_ADDR: &str = "ANALYSIS_LISTEN_ADDR";
pub const GATEWAY_ADDR: &str = "GATEWAY_ADDR";
pub const FILE_STORAGE_ADDR: &str = "FILE_STORAGE_ADDR";
pub const ANALYSIS_ADDR: &str = "ANALYSIS_ADDR";
pub const STORAGE_DIR: &str = "STORAGE_DIR";
pub const WORDCLOUD_RENDERER_URL: &str = "WORDCLOUD_RENDERER_URL";
pub const RENDERER_TIMEOUT_SECS: &str = "RENDERER_TIMEOUT_SECS";
pub const STORAGE_FETCH_TIMEOUT_SECS: &str = "STORAGE_FETCH_TIMEOUT_SECS";
pub const MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
pub const TEXTCLOUD_ENABLE_REFLECTION: &str = "TEXTCLOUD_ENABLE_REFLECTION";

/// Reads a variable from the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Storage service configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub listen_addr: SocketAddr,
    pub storage_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub enable_reflection: bool,
}

impl StorageConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let storage_dir = non_empty(lookup(STORAGE_DIR))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        Ok(Self {
            listen_addr: socket_addr(
                FILE_STORAGE_LISTEN_ADDR,
                lookup(FILE_STORAGE_LISTEN_ADDR),
                DEFAULT_STORAGE_LISTEN_ADDR,
            )?,
            storage_dir,
            max_upload_bytes: byte_count(
                MAX_UPLOAD_BYTES,
                lookup(MAX_UPLOAD_BYTES),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            enable_reflection: flag(
                TEXTCLOUD_ENABLE_REFLECTION,
                lookup(TEXTCLOUD_ENABLE_REFLECTION),
            )?,
        })
    }
}

/// Analysis service configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub listen_addr: SocketAddr,
    pub storage_addr: String,
    pub renderer_url: String,
    pub renderer_timeout: Duration,
    /// Upper bound on each fetch from storage, whatever the caller's deadline.
    pub storage_fetch_timeout: Duration,
    pub max_upload_bytes: usize,
    pub enable_reflection: bool,
}

impl AnalysisConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            listen_addr: socket_addr(
                ANALYSIS_LISTEN_ADDR,
                lookup(ANALYSIS_LISTEN_ADDR),
                DEFAULT_ANALYSIS_LISTEN_ADDR,
            )?,
            storage_addr: endpoint(
                FILE_STORAGE_ADDR,
                lookup(FILE_STORAGE_ADDR),
                DEFAULT_STORAGE_ADDR,
            )?,
            renderer_url: renderer_url(lookup(WORDCLOUD_RENDERER_URL))?,
            renderer_timeout: seconds(
                RENDERER_TIMEOUT_SECS,
                lookup(RENDERER_TIMEOUT_SECS),
                DEFAULT_RENDERER_TIMEOUT_SECS,
            )?,
            storage_fetch_timeout: seconds(
                STORAGE_FETCH_TIMEOUT_SECS,
                lookup(STORAGE_FETCH_TIMEOUT_SECS),
                DEFAULT_STORAGE_FETCH_TIMEOUT_SECS,
            )?,
            max_upload_bytes: byte_count(
                MAX_UPLOAD_BYTES,
                lookup(MAX_UPLOAD_BYTES),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            enable_reflection: flag(
                TEXTCLOUD_ENABLE_REFLECTION,
                lookup(TEXTCLOUD_ENABLE_REFLECTION),
            )?,
        })
    }
}

/// Per-route deadlines the gateway attaches to outbound calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteBudgets {
    pub upload: Duration,
    pub download: Duration,
    pub analyze: Duration,
    pub word_cloud: Duration,
}

impl Default for RouteBudgets {
    fn default() -> Self {
        Self {
            upload: UPLOAD_TIMEOUT,
            download: DOWNLOAD_TIMEOUT,
            analyze: ANALYZE_TIMEOUT,
            word_cloud: WORD_CLOUD_TIMEOUT,
        }
    }
}

/// Gateway configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    pub storage_addr: String,
    pub analysis_addr: String,
    pub max_upload_bytes: usize,
    pub budgets: RouteBudgets,
}

impl GatewayConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            listen_addr: socket_addr(GATEWAY_ADDR, lookup(GATEWAY_ADDR), DEFAULT_GATEWAY_ADDR)?,
            storage_addr: endpoint(
                FILE_STORAGE_ADDR,
                lookup(FILE_STORAGE_ADDR),
                DEFAULT_STORAGE_ADDR,
            )?,
            analysis_addr: endpoint(ANALYSIS_ADDR, lookup(ANALYSIS_ADDR), DEFAULT_ANALYSIS_ADDR)?,
            max_upload_bytes: byte_count(
                MAX_UPLOAD_BYTES,
                lookup(MAX_UPLOAD_BYTES),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            budgets: RouteBudgets::default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.into(),
    }
}

/// Parse a listen address such as `0.0.0.0:50051`. Unset or blank values use `default`.
pub fn socket_addr(
    name: &'static str,
    value: Option<String>,
    default: &str,
) -> ConfigResult<SocketAddr> {
    let raw = non_empty(value).unwrap_or_else(|| default.to_string());
    raw.parse()
        .map_err(|e| invalid(name, format!("'{}' is not a socket address: {}", raw, e)))
}

/// Parse a backend address for a gRPC channel.
///
/// `host:port` is accepted and becomes `http://host:port`.
pub fn endpoint(name: &'static str, value: Option<String>, default: &str) -> ConfigResult<String> {
    let raw = non_empty(value).unwrap_or_else(|| default.to_string());
    let addr = if raw.contains("://") {
        raw
    } else {
        format!("http://{}", raw)
    };

    let uri: tonic::transport::Uri = addr
        .parse()
        .map_err(|e| invalid(name, format!("'{}' is not a valid URI: {}", addr, e)))?;
    if uri.host().is_none() {
        return Err(invalid(name, format!("'{}' has no host", addr)));
    }
    Ok(addr)
}

fn renderer_url(value: Option<String>) -> ConfigResult<String> {
    let raw = non_empty(value).unwrap_or_else(|| DEFAULT_RENDERER_URL.to_string());
    let url = reqwest::Url::parse(&raw)
        .map_err(|e| invalid(WORDCLOUD_RENDERER_URL, format!("'{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(raw),
        other => Err(invalid(
            WORDCLOUD_RENDERER_URL,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

/// Parse a positive whole number of seconds.
pub fn seconds(name: &'static str, value: Option<String>, default: u64) -> ConfigResult<Duration> {
    let secs = match non_empty(value) {
        None => default,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| invalid(name, format!("'{}' is not a whole number of seconds", raw)))?,
    };
    if secs == 0 {
        return Err(invalid(name, "must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a positive byte count.
pub fn byte_count(
    name: &'static str,
    value: Option<String>,
    default: usize,
) -> ConfigResult<usize> {
    let bytes = match non_empty(value) {
        None => default,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| invalid(name, format!("'{}' is not a byte count", raw)))?,
    };
    if bytes == 0 {
        return Err(invalid(name, "must be greater than zero"));
    }
    Ok(bytes)
}

/// Parse a boolean switch. Unset means `false`.
pub fn flag(name: &'static str, value: Option<String>) -> ConfigResult<bool> {
    let Some(raw) = non_empty(value) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, format!("'{}' is not a boolean", raw))),
    }
}
