//! Word-cloud renderer client.
//!
//! The renderer is an external HTTP service treated as a black box: it receives the text and
//! image dimensions as JSON and answers `200` with image bytes. Any other outcome is a
//! [`ServiceError::Render`].

use crate::constants::{WORD_CLOUD_FORMAT, WORD_CLOUD_HEIGHT, WORD_CLOUD_WIDTH};
use crate::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JSON payload sent to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
}

impl RenderRequest {
    /// An 800x800 PNG request for `text`.
    pub fn png(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: WORD_CLOUD_FORMAT.to_string(),
            width: WORD_CLOUD_WIDTH,
            height: WORD_CLOUD_HEIGHT,
        }
    }
}

/// Anything that can turn a [`RenderRequest`] into image bytes.
///
/// Injected into [`crate::AnalysisOrchestrator`] so tests can substitute a double.
#[tonic::async_trait]
pub trait WordCloudRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> ServiceResult<Vec<u8>>;
}

/// [`WordCloudRenderer`] that POSTs to an HTTP endpoint. One attempt per call.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRenderer {
    /// Builds a renderer for `endpoint` whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns `ServiceError::Render` if the HTTP client cannot be constructed (for example when
    /// the TLS backend fails to initialise).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Render(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[tonic::async_trait]
impl WordCloudRenderer for HttpRenderer {
    async fn render(&self, request: &RenderRequest) -> ServiceResult<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Render(format!("renderer unreachable: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ServiceError::Render(format!(
                "renderer responded with {}",
                status
            )));
        }

        let image = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Render(format!("cannot read renderer response: {}", e)))?;

        tracing::debug!(bytes = image.len(), "word cloud rendered");
        Ok(image.to_vec())
    }
}
