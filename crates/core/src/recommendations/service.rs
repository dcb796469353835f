//! Recommendation flow with best-effort persistence

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::engine::RecommendationEngine;
use super::sink::{RecommendationSink, StoredRecommendation};
use super::types::RecommendationResult;
use crate::catalog::Catalog;
use crate::domain::wizard::WizardSteps;
use crate::session::SessionId;

#[derive(Clone)]
pub struct RecommendationService {
    engine: RecommendationEngine,
    catalog: Arc<Catalog>,
    sink: Arc<dyn RecommendationSink>,
}

impl RecommendationService {
    pub fn new(
        engine: RecommendationEngine,
        catalog: Arc<Catalog>,
        sink: Arc<dyn RecommendationSink>,
    ) -> Self {
        Self { engine, catalog, sink }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sink(&self) -> &Arc<dyn RecommendationSink> {
        &self.sink
    }

    /// Computes recommendations and stores them for the session. A storage
    /// failure is logged and the computed list is still returned.
    pub async fn recommend_and_record(
        &self,
        session_id: &SessionId,
        steps: &WizardSteps,
    ) -> Vec<RecommendationResult> {
        let results = self.engine.recommend(self.catalog.packages(), steps);
        let rows = StoredRecommendation::ranked(session_id, &results, Utc::now());

        match self.sink.store(session_id, rows).await {
            Ok(()) => info!(
                event_name = "recommendation.recorded",
                session_id = %session_id,
                recommendation_count = results.len(),
                "recommendations recorded"
            ),
            Err(error) => warn!(
                event_name = "recommendation.persist_failed",
                session_id = %session_id,
                error = %error,
                "recommendations computed but could not be stored"
            ),
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::domain::wizard::WizardStepRecord;
    use crate::errors::ApplicationError;
    use crate::recommendations::InMemoryRecommendationSink;

    struct FailingSink;

    #[async_trait]
    impl RecommendationSink for FailingSink {
        async fn store(
            &self,
            _session_id: &SessionId,
            _recommendations: Vec<StoredRecommendation>,
        ) -> Result<(), ApplicationError> {
            Err(ApplicationError::Persistence("storage offline".to_string()))
        }

        async fn load(
            &self,
            _session_id: &SessionId,
        ) -> Result<Vec<StoredRecommendation>, ApplicationError> {
            Err(ApplicationError::Persistence("storage offline".to_string()))
        }
    }

    fn steps() -> WizardSteps {
        WizardSteps::from_records(&[
            WizardStepRecord::new(1, json!({ "selectedCategories": ["body"] })),
            WizardStepRecord::new(2, json!({ "selectedConcerns": ["stubborn_fat"] })),
        ])
        .expect("fixture steps are valid")
    }

    fn demo_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::demo().expect("demo catalog is valid"))
    }

    #[tokio::test]
    async fn results_are_stored_with_rank() {
        let sink = Arc::new(InMemoryRecommendationSink::new());
        let service = RecommendationService::new(
            RecommendationEngine::new(),
            demo_catalog(),
            sink.clone(),
        );
        let session = SessionId::new();

        let results = service.recommend_and_record(&session, &steps()).await;
        let stored = sink.load(&session).await.expect("load");

        assert_eq!(stored.len(), results.len());
        for (rank, (row, result)) in stored.iter().zip(&results).enumerate() {
            assert_eq!(row.rank as usize, rank + 1);
            assert_eq!(&row.result, result);
        }
    }

    #[tokio::test]
    async fn storage_failure_still_returns_results() {
        let service = RecommendationService::new(
            RecommendationEngine::new(),
            demo_catalog(),
            Arc::new(FailingSink),
        );

        let results = service.recommend_and_record(&SessionId::new(), &steps()).await;

        let codes: Vec<_> = results.iter().map(|result| result.package_code.as_str()).collect();
        assert_eq!(codes, vec!["BODY-LIPO-P", "BODY-LIPO-L"]);
    }
}
