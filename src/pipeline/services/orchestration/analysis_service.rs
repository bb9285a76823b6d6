use super::{request::AnalysisRequest, room_analyzer::RoomAnalyzer};
use crate::{error::AppError, pipeline::types::AnalysisResult};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;
use tracing::error;

/// Tower front for [`RoomAnalyzer`]; each call runs on the blocking pool.
#[derive(Clone)]
pub struct AnalysisService {
    analyzer: Arc<RoomAnalyzer>,
}

impl AnalysisService {
    pub fn new(analyzer: Arc<RoomAnalyzer>) -> Self {
        Self { analyzer }
    }
}

impl Service<AnalysisRequest> for AnalysisService {
    type Response = AnalysisResult;
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: AnalysisRequest) -> Self::Future {
        let analyzer = self.analyzer.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || analyzer.analyze_request(&request))
                .await
                .map_err(|e| {
                    error!("Analysis worker failed: {}", e);
                    AppError::Worker(e.to_string())
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::pipeline::types::SystemType;
    use std::time::Duration;
    use tower::{ServiceBuilder, ServiceExt};

    fn service() -> AnalysisService {
        let analyzer = RoomAnalyzer::new(AnalyzerConfig::default()).unwrap();
        AnalysisService::new(Arc::new(analyzer))
    }

    #[tokio::test]
    async fn analyzes_through_the_service() {
        let request = AnalysisRequest::new("bedroom", "", b"not an image".to_vec());
        let result = service().oneshot(request).await.unwrap();
        assert_eq!(result.system_type(), SystemType::BasicTemplate);
    }

    #[tokio::test]
    async fn runs_under_concurrency_limit_and_timeout() {
        let stack = ServiceBuilder::new()
            .concurrency_limit(2)
            .timeout(Duration::from_secs(30))
            .service(service());

        let calls = ["bedroom", "kitchen", "garage"].map(|room| {
            stack
                .clone()
                .oneshot(AnalysisRequest::new(room, "", b"plain text".to_vec()))
        });
        let results = futures::future::join_all(calls).await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
