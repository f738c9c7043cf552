use std::sync::Arc;

use async_trait::async_trait;

use models::analytics::AnalyticsSummary;
use models::recommendation::Recommendation;

use crate::error::ApiError;
use crate::records::RecordService;

/// Aggregates are computed server-side; the client fetches them wholesale.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn summary(&self) -> Result<AnalyticsSummary, ApiError>;
    /// CSV export of one dataset (`"songs"`, `"services"`, `"usage"`).
    async fn export(&self, kind: &str) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
pub trait RecommendationsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Recommendation>, ApiError>;
}

pub struct HttpAnalyticsApi {
    records: Arc<RecordService>,
}

impl HttpAnalyticsApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl AnalyticsApi for HttpAnalyticsApi {
    async fn summary(&self) -> Result<AnalyticsSummary, ApiError> {
        self.records.get_json("/api/worship/analytics/summary").await
    }

    async fn export(&self, kind: &str) -> Result<Vec<u8>, ApiError> {
        self.records.get_bytes(&format!("/api/worship/analytics/export/{kind}")).await
    }
}

pub struct HttpRecommendationsApi {
    records: Arc<RecordService>,
}

impl HttpRecommendationsApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecommendationsApi for HttpRecommendationsApi {
    async fn list(&self) -> Result<Vec<Recommendation>, ApiError> {
        self.records.get_json("/api/worship/recommendations").await
    }
}

/// In-memory mocks for tests.
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MockAnalyticsApi {
        pub summary: Mutex<AnalyticsSummary>,
        pub export_body: Mutex<Vec<u8>>,
        pub fail: Mutex<Option<ApiError>>,
    }

    impl MockAnalyticsApi {
        pub fn fail_with(&self, err: ApiError) {
            *self.fail.lock().unwrap() = Some(err);
        }

        fn check(&self) -> Result<(), ApiError> {
            match &*self.fail.lock().unwrap() {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AnalyticsApi for MockAnalyticsApi {
        async fn summary(&self) -> Result<AnalyticsSummary, ApiError> {
            self.check()?;
            Ok(self.summary.lock().unwrap().clone())
        }

        async fn export(&self, _kind: &str) -> Result<Vec<u8>, ApiError> {
            self.check()?;
            Ok(self.export_body.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    pub struct MockRecommendationsApi {
        pub recommendations: Mutex<Vec<Recommendation>>,
        pub fail: Mutex<Option<ApiError>>,
    }

    #[async_trait]
    impl RecommendationsApi for MockRecommendationsApi {
        async fn list(&self) -> Result<Vec<Recommendation>, ApiError> {
            if let Some(e) = &*self.fail.lock().unwrap() {
                return Err(e.clone());
            }
            Ok(self.recommendations.lock().unwrap().clone())
        }
    }
}
