//! Blob-plus-sidecar file store.
//!
//! [`FileStore`] performs blocking filesystem I/O on the calling thread. Async callers are
//! expected to move calls onto a blocking pool.
//!
//! # Write ordering
//!
//! `store` writes the sidecar first and the blob last. The blob is staged under a
//! `.partial` name and renamed into place, so a concurrent `get` either sees the complete
//! content or `NotFound`, never a truncated file. If the blob write fails the orphaned sidecar is
//! harmless because nothing can address it.
//!
//! Concurrent stores are not coordinated with each other; distinct identifiers are what keeps
//! them apart.

use crate::constants::{META_EXTENSION, PARTIAL_EXTENSION, UNKNOWN_FILENAME};
use crate::{FilesError, FilesResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use textcloud_uuid::FileId;

/// A file as returned by [`FileStore::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: FileId,
    pub filename: String,
    pub content: Vec<u8>,
}

/// Storage engine bound to a single directory
///
/// Stateless apart from the directory path; cloning is cheap and clones share the same
/// namespace on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Canonicalised storage directory
    root_directory: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root_directory`, creating the directory if absent
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidRootDirectory` if:
    /// - the directory cannot be created
    /// - the path exists but is not a directory
    /// - path canonicalisation fails
    pub fn new(root_directory: &Path) -> FilesResult<Self> {
        fs::create_dir_all(root_directory).map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot create directory {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        if !root_directory.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        let root_directory = root_directory.canonicalize().map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        Ok(Self { root_directory })
    }

    /// Persists `content` under a fresh identifier and records `filename` in its sidecar
    ///
    /// # Returns
    ///
    /// The identifier to pass to [`FileStore::get`].
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Persistence` if either artifact cannot be written.
    pub fn store(&self, filename: &str, content: &[u8]) -> FilesResult<FileId> {
        let id = FileId::new();

        let meta_path = self.meta_path(&id);
        fs::write(&meta_path, filename.as_bytes()).map_err(|source| {
            FilesError::Persistence {
                path: meta_path.clone(),
                source,
            }
        })?;

        let partial_path = self.partial_path(&id);
        let content_path = self.content_path(&id);
        fs::write(&partial_path, content)
            .and_then(|()| fs::rename(&partial_path, &content_path))
            .map_err(|source| {
                // Best effort; the partial file is unreachable either way.
                let _ = fs::remove_file(&partial_path);
                FilesError::Persistence {
                    path: content_path.clone(),
                    source,
                }
            })?;

        tracing::debug!(file_id = %id, size = content.len(), "stored file");
        Ok(id)
    }

    /// Reads a stored file by identifier
    ///
    /// Identifiers that are not in canonical form cannot have been issued by `store` and are
    /// reported as `NotFound` without touching the filesystem.
    ///
    /// # Errors
    ///
    /// - `FilesError::NotFound` if no content blob exists for `id`
    /// - `FilesError::Io` if the blob exists but cannot be read
    pub fn get(&self, id: &str) -> FilesResult<StoredFile> {
        let id = FileId::parse(id).map_err(|_| FilesError::NotFound(id.to_string()))?;

        let content = fs::read(self.content_path(&id)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FilesError::NotFound(id.to_string()),
            _ => FilesError::Io(e),
        })?;

        let filename = self.read_filename(&id);

        Ok(StoredFile {
            id,
            filename,
            content,
        })
    }

    /// Returns the canonicalised storage directory
    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    fn read_filename(&self, id: &FileId) -> String {
        match fs::read(self.meta_path(id)) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(file_id = %id, "unreadable metadata sidecar: {}", e);
                }
                UNKNOWN_FILENAME.to_string()
            }
        }
    }

    fn content_path(&self, id: &FileId) -> PathBuf {
        self.root_directory.join(id.to_string())
    }

    fn meta_path(&self, id: &FileId) -> PathBuf {
        self.root_directory.join(format!("{}.{}", id, META_EXTENSION))
    }

    fn partial_path(&self, id: &FileId) -> PathBuf {
        self.root_directory.join(format!("{}.{}", id, PARTIAL_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(temp: &TempDir) -> FileStore {
        FileStore::new(&temp.path().join("data")).unwrap()
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("data");

        let store = FileStore::new(&root).unwrap();

        assert!(root.is_dir());
        assert!(store.root_directory().ends_with("data"));
    }

    #[test]
    fn test_new_accepts_existing_directory() {
        let temp = TempDir::new().unwrap();

        let store = FileStore::new(temp.path());

        assert!(store.is_ok());
    }

    #[test]
    fn test_new_rejects_regular_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("file.txt");
        fs::write(&root, "not a directory").unwrap();

        let store = FileStore::new(&root);

        assert!(matches!(store, Err(FilesError::InvalidRootDirectory(_))));
    }

    #[test]
    fn test_store_writes_blob_and_sidecar() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let id = store.store("test.txt", b"Hello, World!").unwrap();

        let blob = store.root_directory().join(id.to_string());
        let meta = store.root_directory().join(format!("{}.meta", id));
        assert_eq!(fs::read(blob).unwrap(), b"Hello, World!");
        assert_eq!(fs::read(meta).unwrap(), b"test.txt");
    }

    #[test]
    fn test_store_leaves_no_partial_files() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        store.store("a.txt", b"a").unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.root_directory())
            .unwrap()
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "partial"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_store_and_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let test_cases = vec![
            ("text.txt", b"Plain text content".to_vec()),
            ("empty.dat", vec![]),
            ("binary.bin", (0..=255).collect::<Vec<u8>>()),
            ("отчёт 2024.txt", "Привет, мир\n".as_bytes().to_vec()),
        ];

        for (filename, content) in test_cases {
            let id = store.store(filename, &content).unwrap();
            let file = store.get(&id.to_string()).unwrap();

            assert_eq!(file.id, id);
            assert_eq!(file.filename, filename, "filename mismatch for {}", filename);
            assert_eq!(file.content, content, "content mismatch for {}", filename);
        }
    }

    #[test]
    fn test_same_content_twice_gets_distinct_ids() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let first = store.store("first.txt", b"same").unwrap();
        let second = store.store("second.txt", b"same").unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get(&first.to_string()).unwrap().filename, "first.txt");
        assert_eq!(store.get(&second.to_string()).unwrap().filename, "second.txt");
    }

    #[test]
    fn test_get_never_stored_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let result = store.get(&FileId::new().to_string());

        assert!(matches!(result, Err(FilesError::NotFound(_))));
    }

    #[test]
    fn test_get_non_canonical_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);
        fs::write(temp.path().join("secret"), b"outside").unwrap();

        for id in ["../secret", "", "1718000000123456789", "ABCDEF"] {
            let result = store.get(id);
            assert!(
                matches!(result, Err(FilesError::NotFound(_))),
                "expected NotFound for {:?}",
                id
            );
        }
    }

    #[test]
    fn test_get_missing_sidecar_falls_back_to_unknown() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let id = store.store("report.txt", b"content").unwrap();
        fs::remove_file(store.root_directory().join(format!("{}.meta", id))).unwrap();

        let file = store.get(&id.to_string()).unwrap();

        assert_eq!(file.filename, UNKNOWN_FILENAME);
        assert_eq!(file.content, b"content");
    }

    #[test]
    fn test_get_sidecar_without_blob_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let id = store.store("report.txt", b"content").unwrap();
        fs::remove_file(store.root_directory().join(id.to_string())).unwrap();

        assert!(matches!(
            store.get(&id.to_string()),
            Err(FilesError::NotFound(_))
        ));
    }

    #[test]
    fn test_store_into_vanished_directory_is_persistence_error() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);
        fs::remove_dir_all(store.root_directory()).unwrap();

        let result = store.store("lost.txt", b"bytes");

        match result {
            Err(FilesError::Persistence { source, .. }) => {
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("Expected Persistence error, got {:?}", other),
        }
    }

    #[test]
    fn test_clones_share_namespace() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);
        let clone = store.clone();

        let id = store.store("shared.txt", b"shared").unwrap();

        assert_eq!(clone.get(&id.to_string()).unwrap().content, b"shared");
    }
}
