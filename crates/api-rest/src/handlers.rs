use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path as AxumPath, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use textcloud_core::{AnalysisResult, FileId, ServiceError, ServiceResult};
use textcloud_files::UNKNOWN_FILENAME;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: FileId,
}

/// Runs `call` under the route's `budget`. An elapsed budget is reported like any other
/// upstream failure.
async fn within<T>(
    budget: Duration,
    call: impl Future<Output = ServiceResult<T>>,
) -> ServiceResult<T> {
    tokio::time::timeout(budget, call).await.unwrap_or_else(|_| {
        Err(ServiceError::UpstreamUnavailable(format!(
            "no response within {:?}",
            budget
        )))
    })
}

/// Health check endpoint for the gateway.
///
/// Answers from the gateway alone and does not probe the backends.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<api_shared::pb::HealthRes> {
    Json(state.health.check_health())
}

/// Upload a file from the multipart field `file`
///
/// # Returns
/// * `Ok(Json<UploadResponse>)` - The id assigned by storage
///
/// # Errors
/// * `400 Bad Request` if the body is not multipart, has no `file` field, or the field
///   cannot be read in full (including bodies over the upload limit).
/// * `500 Internal Server Error` if storage fails or does not answer within the upload budget.
#[axum::debug_handler]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("upload rejected: {}", e);
        ApiError::FILE_REQUIRED
    })?;

    let (filename, content) = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(ApiError::FILE_REQUIRED),
            Err(e) => {
                tracing::warn!("malformed multipart body: {}", e);
                return Err(ApiError::FILE_REQUIRED);
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or(UNKNOWN_FILENAME).to_string();
        let content = field.bytes().await.map_err(|e| {
            tracing::warn!(%filename, "cannot read upload: {}", e);
            ApiError::UNREADABLE_FILE
        })?;
        break (filename, content.to_vec());
    };

    let budget = state.budgets.upload;
    let size = content.len();
    let file_id = within(budget, state.storage.store(&filename, content, budget))
        .await
        .map_err(|e| {
            tracing::error!(%filename, "store failed: {}", e);
            ApiError::STORE_FAILED
        })?;

    tracing::info!(%file_id, %filename, size, "file uploaded");
    Ok(Json(UploadResponse { file_id }))
}

/// Download a stored file as an attachment
///
/// # Errors
/// Returns `404 Not Found` for any failure, including storage being unreachable.
#[axum::debug_handler]
pub async fn download(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Response, ApiError> {
    let budget = state.budgets.download;
    let file = within(budget, state.storage.get(&id, budget))
        .await
        .map_err(|e| {
            tracing::warn!(file_id = %id, "download failed: {}", e);
            ApiError::FILE_NOT_FOUND
        })?;

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        ),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&file.filename),
        ),
    ];
    Ok((headers, file.content).into_response())
}

/// Count paragraphs, words and characters of a stored file
///
/// # Errors
/// Returns `500 Internal Server Error` for any failure, a missing file included.
#[axum::debug_handler]
pub async fn analyze(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let budget = state.budgets.analyze;
    let result = within(budget, state.analysis.analyze_file(&id, budget))
        .await
        .map_err(|e| {
            tracing::error!(file_id = %id, "analysis failed: {}", e);
            ApiError::ANALYZE_FAILED
        })?;

    Ok(Json(result))
}

/// Render a word cloud of a stored file as PNG
///
/// # Errors
/// Returns `500 Internal Server Error` for any failure.
#[axum::debug_handler]
pub async fn word_cloud(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Response, ApiError> {
    let budget = state.budgets.word_cloud;
    let image = within(budget, state.analysis.generate_word_cloud(&id, budget))
        .await
        .map_err(|e| {
            tracing::error!(file_id = %id, "word cloud failed: {}", e);
            ApiError::WORD_CLOUD_FAILED
        })?;

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
        image.bytes,
    )
        .into_response())
}

/// `attachment; filename=<name>` with control characters replaced so the header stays valid.
pub fn content_disposition(filename: &str) -> HeaderValue {
    let safe: String = filename
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();
    HeaderValue::from_bytes(format!("attachment; filename={}", safe).as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
