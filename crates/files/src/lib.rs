//! Textcloud File Storage
//!
//! This crate owns the bytes of every uploaded file. It is used by the storage gRPC service and
//! nothing else writes to its directory.
//!
//! ## Storage Layout
//!
//! ```text
//! <storage_dir>/
//! ├── 550e8400e29b41d4a716446655440000        # content blob, exact uploaded bytes
//! └── 550e8400e29b41d4a716446655440000.meta   # sidecar, raw filename bytes
//! ```
//!
//! The content blob is authoritative: a file exists if and only if its blob exists. The sidecar
//! is best-effort metadata, and a missing or unreadable sidecar degrades the filename to
//! [`UNKNOWN_FILENAME`] instead of failing the read.
//!
//! ## Example Usage
//!
//! ```no_run
//! use textcloud_files::FileStore;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new(Path::new("./data"))?;
//! let id = store.store("notes.txt", b"Hello\nWorld")?;
//! let file = store.get(&id.to_string())?;
//! assert_eq!(file.filename, "notes.txt");
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;

pub use constants::{DEFAULT_STORAGE_DIR, META_EXTENSION, UNKNOWN_FILENAME};
pub use files::{FileStore, StoredFile};
pub use textcloud_uuid::FileId;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Storage directory could not be created or is not a directory
    #[error("Invalid storage directory: {0}")]
    InvalidRootDirectory(String),

    /// No content blob exists for the requested identifier
    #[error("File not found: {0}")]
    NotFound(String),

    /// The medium rejected a write during store
    #[error("Failed to persist {path}: {source}")]
    Persistence {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading an existing blob
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FilesResult<T> = Result<T, FilesError>;
