//! Storage capability.
//!
//! The gateway and the analysis orchestrator only ever see [`FileStorage`]. Two implementations
//! ship with the crate:
//! - [`LocalFileStorage`], the engine itself, used by the storage gRPC service
//! - [`crate::client::StorageClient`], the gRPC stub used by everyone else

use crate::{ServiceError, ServiceResult};
use std::time::Duration;
use textcloud_files::{FileId, FileStore, StoredFile};

/// Store/get access to uploaded files.
///
/// `timeout` is the caller's budget for this one call. Implementations that cross a network
/// attach it to the outgoing request; local ones bound their blocking work with it.
#[tonic::async_trait]
pub trait FileStorage: Send + Sync {
    async fn store(
        &self,
        filename: &str,
        content: Vec<u8>,
        timeout: Duration,
    ) -> ServiceResult<FileId>;

    async fn get(&self, file_id: &str, timeout: Duration) -> ServiceResult<StoredFile>;
}

/// [`FileStorage`] backed by a [`FileStore`] on local disk.
///
/// Each call runs on tokio's blocking pool. When `timeout` elapses the caller gets
/// `UpstreamUnavailable` while the blocking write or read is left to finish on its own.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    store: FileStore,
}

impl LocalFileStorage {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    pub fn file_store(&self) -> &FileStore {
        &self.store
    }
}

#[tonic::async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(
        &self,
        filename: &str,
        content: Vec<u8>,
        timeout: Duration,
    ) -> ServiceResult<FileId> {
        let store = self.store.clone();
        let filename = filename.to_owned();
        let id = run_blocking(timeout, move || store.store(&filename, &content)).await?;
        tracing::info!(file_id = %id, "file stored");
        Ok(id)
    }

    async fn get(&self, file_id: &str, timeout: Duration) -> ServiceResult<StoredFile> {
        let store = self.store.clone();
        let file_id = file_id.to_owned();
        run_blocking(timeout, move || store.get(&file_id)).await
    }
}

async fn run_blocking<T, F>(timeout: Duration, f: F) -> ServiceResult<T>
where
    F: FnOnce() -> textcloud_files::FilesResult<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);
    match tokio::time::timeout(timeout, task).await {
        Err(_) => Err(ServiceError::UpstreamUnavailable(format!(
            "storage did not finish within {:?}",
            timeout
        ))),
        Ok(Err(join_error)) => Err(ServiceError::Persistence(format!(
            "storage task failed: {}",
            join_error
        ))),
        Ok(Ok(result)) => result.map_err(ServiceError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BUDGET: Duration = Duration::from_secs(5);

    fn local_storage(temp: &TempDir) -> LocalFileStorage {
        LocalFileStorage::new(FileStore::new(&temp.path().join("data")).unwrap())
    }

    #[tokio::test]
    async fn test_store_then_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let storage = local_storage(&temp);

        let id = storage
            .store("notes.txt", b"Hello\nWorld".to_vec(), BUDGET)
            .await
            .unwrap();
        let file = storage.get(&id.to_string(), BUDGET).await.unwrap();

        assert_eq!(file.filename, "notes.txt");
        assert_eq!(file.content, b"Hello\nWorld");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let storage = local_storage(&temp);

        let err = storage
            .get(&FileId::new().to_string(), BUDGET)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let temp = TempDir::new().unwrap();
        let storage = local_storage(&temp);
        std::fs::remove_dir_all(storage.file_store().root_directory()).unwrap();

        let err = storage
            .store("a.txt", b"a".to_vec(), BUDGET)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_elapsed_budget_is_upstream_unavailable() {
        let result: ServiceResult<()> = run_blocking(Duration::from_millis(10), || {
            std::thread::sleep(Duration::from_millis(200));
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ServiceError::UpstreamUnavailable(_))));
    }
}
