//! Typed gRPC stubs for the storage and analysis services.
//!
//! Both clients wrap a lazily connected [`Channel`]: construction never touches the network, the
//! first call dials, and later calls reuse the connection. Cloning a client is cheap and shares
//! the channel.
//!
//! Every call carries its budget twice: as the `grpc-timeout` header so the server can give up,
//! and as a local timer so the caller is released even if the server never answers.

use crate::analysis::AnalysisResult;
use crate::constants::{CONNECT_TIMEOUT, MESSAGE_OVERHEAD_BYTES};
use crate::orchestrator::{TextAnalysis, WordCloudImage};
use crate::storage::FileStorage;
use crate::{ServiceError, ServiceResult};
use api_shared::pb;
use api_shared::pb::analysis_client::AnalysisClient as AnalysisRpcClient;
use api_shared::pb::file_storage_client::FileStorageClient as FileStorageRpcClient;
use std::future::Future;
use std::time::Duration;
use textcloud_files::{FileId, StoredFile};
use tonic::transport::{Channel, Endpoint};
use tonic::{Response, Status};

/// Builds a lazily connected channel to `addr` (for example `http://localhost:50051`).
///
/// # Errors
/// Returns `ServiceError::InvalidRequest` if `addr` is not a valid URI.
pub fn lazy_channel(addr: &str) -> ServiceResult<Channel> {
    let endpoint = Endpoint::from_shared(addr.to_string())
        .map_err(|e| ServiceError::InvalidRequest(format!("invalid endpoint '{}': {}", addr, e)))?
        .connect_timeout(CONNECT_TIMEOUT);
    Ok(endpoint.connect_lazy())
}

fn message_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.saturating_add(MESSAGE_OVERHEAD_BYTES)
}

async fn call<T, F>(
    timeout: Duration,
    fut: F,
    internal: fn(String) -> ServiceError,
) -> ServiceResult<T>
where
    F: Future<Output = Result<Response<T>, Status>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Err(_) => Err(ServiceError::UpstreamUnavailable(format!(
            "no response within {:?}",
            timeout
        ))),
        Ok(Err(status)) => Err(ServiceError::from_status(status, internal)),
        Ok(Ok(response)) => Ok(response.into_inner()),
    }
}

fn with_timeout<T>(message: T, timeout: Duration) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    request.set_timeout(timeout);
    request
}

/// [`FileStorage`] over the storage service's gRPC API.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: FileStorageRpcClient<Channel>,
}

impl StorageClient {
    /// Wraps `channel`, accepting files up to `max_upload_bytes` in either direction.
    pub fn new(channel: Channel, max_upload_bytes: usize) -> Self {
        let limit = message_limit(max_upload_bytes);
        let client = FileStorageRpcClient::new(channel)
            .max_decoding_message_size(limit)
            .max_encoding_message_size(limit);
        Self { client }
    }

    /// Convenience for `StorageClient::new(lazy_channel(addr)?, max_upload_bytes)`.
    pub fn connect_lazy(addr: &str, max_upload_bytes: usize) -> ServiceResult<Self> {
        Ok(Self::new(lazy_channel(addr)?, max_upload_bytes))
    }
}

#[tonic::async_trait]
impl FileStorage for StorageClient {
    async fn store(
        &self,
        filename: &str,
        content: Vec<u8>,
        timeout: Duration,
    ) -> ServiceResult<FileId> {
        let mut client = self.client.clone();
        let request = with_timeout(
            pb::StoreFileReq {
                filename: filename.to_string(),
                content,
            },
            timeout,
        );

        let res = call(timeout, client.store_file(request), ServiceError::Persistence).await?;

        FileId::parse(&res.file_id).map_err(|e| {
            ServiceError::UpstreamUnavailable(format!("storage returned a malformed id: {}", e))
        })
    }

    async fn get(&self, file_id: &str, timeout: Duration) -> ServiceResult<StoredFile> {
        // Nothing the storage service issued can fail this check.
        let id = FileId::parse(file_id).map_err(|_| ServiceError::NotFound(file_id.to_string()))?;

        let mut client = self.client.clone();
        let request = with_timeout(
            pb::GetFileReq {
                file_id: id.to_string(),
            },
            timeout,
        );

        let res = call(timeout, client.get_file(request), ServiceError::Persistence).await?;

        Ok(StoredFile {
            id,
            filename: res.filename,
            content: res.content,
        })
    }
}

/// [`TextAnalysis`] over the analysis service's gRPC API.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: AnalysisRpcClient<Channel>,
}

impl AnalysisClient {
    /// Wraps `channel`; `max_image_bytes` bounds rendered images coming back.
    pub fn new(channel: Channel, max_image_bytes: usize) -> Self {
        let client = AnalysisRpcClient::new(channel)
            .max_decoding_message_size(message_limit(max_image_bytes));
        Self { client }
    }

    pub fn connect_lazy(addr: &str, max_image_bytes: usize) -> ServiceResult<Self> {
        Ok(Self::new(lazy_channel(addr)?, max_image_bytes))
    }
}

#[tonic::async_trait]
impl TextAnalysis for AnalysisClient {
    async fn analyze_file(
        &self,
        file_id: &str,
        timeout: Duration,
    ) -> ServiceResult<AnalysisResult> {
        let mut client = self.client.clone();
        let request = with_timeout(
            pb::AnalyzeFileReq {
                file_id: file_id.to_string(),
            },
            timeout,
        );

        let res = call(timeout, client.analyze_file(request), ServiceError::Render).await?;
        Ok(res.into())
    }

    async fn generate_word_cloud(
        &self,
        file_id: &str,
        timeout: Duration,
    ) -> ServiceResult<WordCloudImage> {
        let mut client = self.client.clone();
        let request = with_timeout(
            pb::WordCloudReq {
                file_id: file_id.to_string(),
            },
            timeout,
        );

        let res = call(timeout, client.generate_word_cloud(request), ServiceError::Render).await?;
        Ok(WordCloudImage { bytes: res.image })
    }
}
