use crate::deadline;
use api_shared::pb::file_storage_server::FileStorage as FileStorageRpc;
use api_shared::pb::{self, HealthRes};
use api_shared::HealthService;
use textcloud_core::constants::{DOWNLOAD_TIMEOUT, UPLOAD_TIMEOUT};
use textcloud_core::FileStorage;
use tonic::{Request, Response, Status};

/// gRPC face of the storage engine.
#[derive(Clone, Debug)]
pub struct StorageGrpcService<S> {
    storage: S,
    health: HealthService,
}

impl<S> StorageGrpcService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            health: HealthService::new("storage"),
        }
    }
}

#[tonic::async_trait]
impl<S> FileStorageRpc for StorageGrpcService<S>
where
    S: FileStorage + 'static,
{
    async fn health(&self, _req: Request<()>) -> Result<Response<HealthRes>, Status> {
        Ok(Response::new(self.health.check_health()))
    }

    async fn store_file(
        &self,
        req: Request<pb::StoreFileReq>,
    ) -> Result<Response<pb::StoreFileRes>, Status> {
        let timeout = deadline::budget(&req, UPLOAD_TIMEOUT);
        let req = req.into_inner();

        let id = self
            .storage
            .store(&req.filename, req.content, timeout)
            .await
            .map_err(|e| {
                tracing::error!(filename = %req.filename, "store failed: {}", e);
                Status::from(e)
            })?;

        Ok(Response::new(pb::StoreFileRes {
            file_id: id.to_string(),
        }))
    }

    async fn get_file(
        &self,
        req: Request<pb::GetFileReq>,
    ) -> Result<Response<pb::GetFileRes>, Status> {
        let timeout = deadline::budget(&req, DOWNLOAD_TIMEOUT);
        let req = req.into_inner();

        let file = self.storage.get(&req.file_id, timeout).await?;

        Ok(Response::new(pb::GetFileRes {
            filename: file.filename,
            content: file.content,
        }))
    }
}
