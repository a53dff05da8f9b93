use crate::deadline;
use api_shared::pb::analysis_server::Analysis as AnalysisRpc;
use api_shared::pb::{self, HealthRes};
use api_shared::HealthService;
use textcloud_core::constants::{ANALYZE_TIMEOUT, WORD_CLOUD_TIMEOUT};
use textcloud_core::TextAnalysis;
use tonic::{Request, Response, Status};

/// gRPC face of the analysis orchestrator.
#[derive(Clone, Debug)]
pub struct AnalysisGrpcService<A> {
    analysis: A,
    health: HealthService,
}

impl<A> AnalysisGrpcService<A> {
    pub fn new(analysis: A) -> Self {
        Self {
            analysis,
            health: HealthService::new("analysis"),
        }
    }
}

#[tonic::async_trait]
impl<A> AnalysisRpc for AnalysisGrpcService<A>
where
    A: TextAnalysis + 'static,
{
    async fn health(&self, _req: Request<()>) -> Result<Response<HealthRes>, Status> {
        Ok(Response::new(self.health.check_health()))
    }

    async fn analyze_file(
        &self,
        req: Request<pb::AnalyzeFileReq>,
    ) -> Result<Response<pb::AnalyzeFileRes>, Status> {
        let timeout = deadline::budget(&req, ANALYZE_TIMEOUT);
        let file_id = req.into_inner().file_id;

        let result = self.analysis.analyze_file(&file_id, timeout).await?;
        tracing::debug!(%file_id, words = result.words, "file analysed");

        Ok(Response::new(result.into()))
    }

    async fn generate_word_cloud(
        &self,
        req: Request<pb::WordCloudReq>,
    ) -> Result<Response<pb::WordCloudRes>, Status> {
        let timeout = deadline::budget(&req, WORD_CLOUD_TIMEOUT);
        let file_id = req.into_inner().file_id;

        let image = self
            .analysis
            .generate_word_cloud(&file_id, timeout)
            .await
            .map_err(|e| {
                tracing::error!(%file_id, "word cloud failed: {}", e);
                Status::from(e)
            })?;

        Ok(Response::new(pb::WordCloudRes { image: image.bytes }))
    }
}
