use std::sync::Arc;

use tracing::instrument;

use client::api::RecommendationsApi;
use client::ApiError;
use models::recommendation::Recommendation;

use crate::reactive::Reactive;

/// Backend-computed song suggestions; the only client-side derivation is
/// top-N selection.
pub struct RecommendationStore {
    api: Arc<dyn RecommendationsApi>,
    pub recommendations: Reactive<Vec<Recommendation>>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl RecommendationStore {
    pub fn new(api: Arc<dyn RecommendationsApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            recommendations: Reactive::new(Vec::new()),
            loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ApiError> {
        self.loading.set(true);
        self.error.set(None);
        let out = match self.api.list().await {
            Ok(recommendations) => {
                self.recommendations.set(recommendations);
                Ok(())
            }
            Err(e) => {
                self.error.set(Some(e.display_message()));
                Err(e)
            }
        };
        self.loading.set(false);
        out
    }

    /// The `n` strongest suggestions, highest score first.
    pub fn top(&self, n: usize) -> Vec<Recommendation> {
        let mut all = self.recommendations.get();
        all.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        all.truncate(n);
        all
    }
}
