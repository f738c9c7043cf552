use std::sync::Arc;

use tracing::{info, instrument};

use client::api::AnalyticsApi;
use client::ApiError;
use models::analytics::AnalyticsSummary;

use crate::reactive::Reactive;

const MAX_INSIGHTS: usize = 5;

/// Analytics dashboard state: a wholesale-fetched summary plus derived
/// insight sentences. Aggregation happens server-side; this store only turns
/// numbers into prose.
pub struct AnalyticsStore {
    api: Arc<dyn AnalyticsApi>,
    pub summary: Reactive<Option<AnalyticsSummary>>,
    pub insights: Reactive<Vec<String>>,
    pub loading: Reactive<bool>,
    pub export_loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl AnalyticsStore {
    pub fn new(api: Arc<dyn AnalyticsApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            summary: Reactive::new(None),
            insights: Reactive::new(Vec::new()),
            loading: Reactive::new(false),
            export_loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    fn fail(&self, e: ApiError) -> ApiError {
        self.error.set(Some(e.display_message()));
        e
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ApiError> {
        self.loading.set(true);
        self.error.set(None);
        let out = match self.api.summary().await {
            Ok(summary) => {
                self.insights.set(insights(&summary));
                self.summary.set(Some(summary));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    /// Fetch a CSV export. The caller owns what happens to the bytes;
    /// failures land in `error` like every other call.
    #[instrument(skip(self))]
    pub async fn export_data(&self, kind: &str) -> Result<Vec<u8>, ApiError> {
        self.export_loading.set(true);
        self.error.set(None);
        let result = self.api.export(kind).await;
        self.export_loading.set(false);
        match result {
            Ok(bytes) => {
                info!(kind, bytes = bytes.len(), "export fetched");
                Ok(bytes)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

/// Fixed sequence of threshold checks, one sentence per condition that
/// holds, truncated to five.
pub fn insights(summary: &AnalyticsSummary) -> Vec<String> {
    let mut out = Vec::new();

    if summary.total_services == 0 {
        out.push("Plan your first service to start building usage history.".to_string());
    }
    if summary.never_used_songs > 0 {
        out.push(format!(
            "{} songs in your catalog have never been used in a service.",
            summary.never_used_songs
        ));
    }
    if summary.songs_added_last_30_days == 0 && summary.total_songs > 0 {
        out.push("No new songs were added in the last 30 days.".to_string());
    }

    // Most recent period vs the average of the four before it.
    if summary.trend.len() >= 2 {
        let latest = summary.trend.last().map(|p| p.services).unwrap_or(0);
        let prior: Vec<u32> = summary
            .trend
            .iter()
            .rev()
            .skip(1)
            .take(4)
            .map(|p| p.services)
            .collect();
        let avg = prior.iter().sum::<u32>() as f64 / prior.len() as f64;
        if (latest as f64) > avg {
            out.push(format!(
                "Service planning is trending up: {latest} services this period against an average of {avg:.1}."
            ));
        } else if (latest as f64) < avg {
            out.push(format!(
                "Service planning is trending down: {latest} services this period against an average of {avg:.1}."
            ));
        }
    }

    if let Some(top) = summary.top_songs.first() {
        out.push(format!(
            "\"{}\" is your most used song with {} plays.",
            top.title, top.usage_count
        ));
    }
    if summary.active_members == 0 {
        out.push("No team members are active yet. Invite your team to collaborate.".to_string());
    }

    out.truncate(MAX_INSIGHTS);
    out
}
