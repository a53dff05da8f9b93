//! Analysis orchestration.
//!
//! [`AnalysisOrchestrator`] is the analysis service's business logic: fetch the file through the
//! storage capability, then either count it or hand it to the renderer. It owns no state beyond
//! its injected collaborators.

use crate::analysis::{analyze, AnalysisResult};
use crate::renderer::{RenderRequest, WordCloudRenderer};
use crate::storage::FileStorage;
use crate::{ServiceError, ServiceResult};
use std::time::Duration;

/// Rendered word-cloud image bytes, exactly as the renderer returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCloudImage {
    pub bytes: Vec<u8>,
}

/// Analysis operations as seen by the gateway.
///
/// Implemented locally by [`AnalysisOrchestrator`] and remotely by
/// [`crate::client::AnalysisClient`].
#[tonic::async_trait]
pub trait TextAnalysis: Send + Sync {
    async fn analyze_file(&self, file_id: &str, timeout: Duration) -> ServiceResult<AnalysisResult>;

    async fn generate_word_cloud(
        &self,
        file_id: &str,
        timeout: Duration,
    ) -> ServiceResult<WordCloudImage>;
}

/// Fetch-then-compute orchestration over injected storage and renderer capabilities.
#[derive(Debug, Clone)]
pub struct AnalysisOrchestrator<S, R> {
    storage: S,
    renderer: R,
    fetch_timeout: Duration,
}

impl<S, R> AnalysisOrchestrator<S, R>
where
    S: FileStorage,
    R: WordCloudRenderer,
{
    /// `fetch_timeout` caps every storage fetch, even when the caller allows more.
    pub fn new(storage: S, renderer: R, fetch_timeout: Duration) -> Self {
        Self {
            storage,
            renderer,
            fetch_timeout,
        }
    }

    /// Any fetch failure other than `NotFound` is reported as `UpstreamUnavailable`.
    async fn fetch_content(&self, file_id: &str, timeout: Duration) -> ServiceResult<Vec<u8>> {
        let file = self
            .storage
            .get(file_id, timeout.min(self.fetch_timeout))
            .await
            .map_err(|e| {
                tracing::warn!(file_id, "storage fetch failed: {}", e);
                match e {
                    ServiceError::NotFound(_) => e,
                    other => ServiceError::UpstreamUnavailable(other.to_string()),
                }
            })?;
        Ok(file.content)
    }
}

#[tonic::async_trait]
impl<S, R> TextAnalysis for AnalysisOrchestrator<S, R>
where
    S: FileStorage,
    R: WordCloudRenderer,
{
    async fn analyze_file(
        &self,
        file_id: &str,
        timeout: Duration,
    ) -> ServiceResult<AnalysisResult> {
        let content = self.fetch_content(file_id, timeout).await?;
        Ok(analyze(&content))
    }

    async fn generate_word_cloud(
        &self,
        file_id: &str,
        timeout: Duration,
    ) -> ServiceResult<WordCloudImage> {
        let content = self.fetch_content(file_id, timeout).await?;
        let request = RenderRequest::png(String::from_utf8_lossy(&content));
        let bytes = self.renderer.render(&request).await?;
        Ok(WordCloudImage { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use textcloud_files::{FileId, StoredFile};

    const BUDGET: Duration = Duration::from_secs(10);

    /// In-memory storage keyed by id; `failure` short-circuits every call.
    #[derive(Default)]
    struct MemoryStorage {
        files: HashMap<String, (String, Vec<u8>)>,
        failure: Option<ServiceError>,
        seen_timeouts: Mutex<Vec<Duration>>,
    }

    impl MemoryStorage {
        fn with_file(id: &str, content: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(
                id.to_string(),
                ("test.txt".to_string(), content.as_bytes().to_vec()),
            );
            Self {
                files,
                ..Default::default()
            }
        }

        fn failing(err: ServiceError) -> Self {
            Self {
                failure: Some(err),
                ..Default::default()
            }
        }
    }

    #[tonic::async_trait]
    impl FileStorage for MemoryStorage {
        async fn store(&self, _: &str, _: Vec<u8>, _: Duration) -> ServiceResult<FileId> {
            unimplemented!("orchestrator never stores")
        }

        async fn get(&self, file_id: &str, timeout: Duration) -> ServiceResult<StoredFile> {
            self.seen_timeouts.lock().unwrap().push(timeout);
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            let (filename, content) = self
                .files
                .get(file_id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(file_id.to_string()))?;
            Ok(StoredFile {
                id: FileId::new(),
                filename,
                content,
            })
        }
    }

    /// Renderer double that records what it was asked to draw.
    struct RecordingRenderer {
        calls: AtomicUsize,
        last: Mutex<Option<RenderRequest>>,
        response: ServiceResult<Vec<u8>>,
    }

    impl RecordingRenderer {
        fn answering(response: ServiceResult<Vec<u8>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
                response,
            })
        }
    }

    #[tonic::async_trait]
    impl WordCloudRenderer for Arc<RecordingRenderer> {
        async fn render(&self, request: &RenderRequest) -> ServiceResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            self.response.clone()
        }
    }

    fn orchestrator(
        storage: MemoryStorage,
        renderer: Arc<RecordingRenderer>,
    ) -> AnalysisOrchestrator<MemoryStorage, Arc<RecordingRenderer>> {
        AnalysisOrchestrator::new(storage, renderer, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_analyze_file_counts_content() {
        let svc = orchestrator(
            MemoryStorage::with_file("1", "Hello\nWorld\n\nTest file."),
            RecordingRenderer::answering(Ok(vec![])),
        );

        let result = svc.analyze_file("1", BUDGET).await.unwrap();

        assert_eq!(
            result,
            AnalysisResult {
                paragraphs: 3,
                words: 4,
                characters: 23
            }
        );
    }

    #[tokio::test]
    async fn test_analyze_empty_and_newline_files() {
        let empty = orchestrator(
            MemoryStorage::with_file("empty", ""),
            RecordingRenderer::answering(Ok(vec![])),
        );
        let newlines = orchestrator(
            MemoryStorage::with_file("newlines", "\n\n\n"),
            RecordingRenderer::answering(Ok(vec![])),
        );

        assert_eq!(
            empty.analyze_file("empty", BUDGET).await.unwrap(),
            AnalysisResult::default()
        );
        assert_eq!(
            newlines.analyze_file("newlines", BUDGET).await.unwrap(),
            AnalysisResult {
                paragraphs: 0,
                words: 0,
                characters: 3
            }
        );
    }

    #[tokio::test]
    async fn test_analyze_missing_file_propagates_not_found() {
        let svc = orchestrator(
            MemoryStorage::default(),
            RecordingRenderer::answering(Ok(vec![])),
        );

        let err = svc.analyze_file("missing", BUDGET).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_timeout_caps_caller_budget() {
        let storage = MemoryStorage::with_file("1", "x");
        let svc = AnalysisOrchestrator::new(
            storage,
            RecordingRenderer::answering(Ok(vec![])),
            Duration::from_secs(2),
        );

        svc.analyze_file("1", Duration::from_secs(10)).await.unwrap();
        svc.analyze_file("1", Duration::from_millis(500))
            .await
            .unwrap();

        assert_eq!(
            *svc.storage.seen_timeouts.lock().unwrap(),
            vec![Duration::from_secs(2), Duration::from_millis(500)]
        );
    }

    #[tokio::test]
    async fn test_word_cloud_returns_renderer_bytes_unchanged() {
        let renderer = RecordingRenderer::answering(Ok(b"imagebytes".to_vec()));
        let svc = orchestrator(
            MemoryStorage::with_file("1", "Hello\nWorld"),
            renderer.clone(),
        );

        let image = svc.generate_word_cloud("1", BUDGET).await.unwrap();

        assert_eq!(image.bytes, b"imagebytes");
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            renderer.last.lock().unwrap().clone(),
            Some(RenderRequest {
                text: "Hello\nWorld".to_string(),
                format: "png".to_string(),
                width: 800,
                height: 800,
            })
        );
    }

    #[tokio::test]
    async fn test_word_cloud_fetch_failure_skips_renderer() {
        let renderer = RecordingRenderer::answering(Ok(b"imagebytes".to_vec()));
        let svc = orchestrator(
            MemoryStorage::failing(ServiceError::UpstreamUnavailable(
                "file storage error".into(),
            )),
            renderer.clone(),
        );

        let err = svc.generate_word_cloud("fail", BUDGET).await.unwrap_err();

        assert!(matches!(err, ServiceError::UpstreamUnavailable(_)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_storage_side_failure_surfaces_as_upstream_unavailable() {
        let renderer = RecordingRenderer::answering(Ok(b"imagebytes".to_vec()));
        let svc = orchestrator(
            MemoryStorage::failing(ServiceError::Persistence(
                "I/O error: permission denied".into(),
            )),
            renderer.clone(),
        );

        let analyzed = svc.analyze_file("1", BUDGET).await.unwrap_err();
        let rendered = svc.generate_word_cloud("1", BUDGET).await.unwrap_err();

        assert!(matches!(analyzed, ServiceError::UpstreamUnavailable(_)));
        assert!(matches!(rendered, ServiceError::UpstreamUnavailable(_)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_word_cloud_render_failure_is_not_success() {
        let renderer = RecordingRenderer::answering(Err(ServiceError::Render(
            "renderer responded with 500".into(),
        )));
        let svc = orchestrator(MemoryStorage::with_file("1", "text"), renderer.clone());

        let err = svc.generate_word_cloud("1", BUDGET).await.unwrap_err();

        assert!(matches!(err, ServiceError::Render(_)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }
}
