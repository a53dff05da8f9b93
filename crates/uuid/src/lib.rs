//! Stored-file identifiers.
//!
//! Every file accepted by the storage service is keyed by a [`FileId`]. The identifier doubles as
//! the on-disk filename of the content blob and its `.meta` sidecar, so its textual form is
//! strictly controlled.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the `simple` rendering of a random (version 4) UUID. Canonical form is *required* for
//! externally supplied identifiers (path segments on the gateway, RPC request fields). Use
//! [`FileId::parse`] to validate an input string; anything else (hyphenated, uppercase, path
//! separators, `..`) is rejected.
//!
//! Identifiers carry no timestamp. Stores issued in the same instant still get distinct ids,
//! and concurrent writers never coordinate.

mod file_id;

pub use file_id::FileId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
