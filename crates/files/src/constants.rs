//! Naming constants for the on-disk layout.

/// Extension of the sidecar file that holds the original filename.
pub const META_EXTENSION: &str = "meta";

/// Extension used for content blobs while they are being written.
pub(crate) const PARTIAL_EXTENSION: &str = "partial";

/// Filename reported when a blob has no readable sidecar.
pub const UNKNOWN_FILENAME: &str = "unknown";

/// Default storage directory, relative to the working directory.
pub const DEFAULT_STORAGE_DIR: &str = "./data";
