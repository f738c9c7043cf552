use std::sync::Arc;

use client::api::insights::mock::MockAnalyticsApi;
use client::ApiError;
use models::analytics::{AnalyticsSummary, SongUsageRow};
use stores::analytics::AnalyticsStore;

#[tokio::test]
async fn load_fills_summary_and_insights() {
    let api = Arc::new(MockAnalyticsApi::default());
    *api.summary.lock().unwrap() = AnalyticsSummary {
        total_songs: 40,
        total_services: 12,
        active_members: 6,
        songs_added_last_30_days: 2,
        never_used_songs: 7,
        trend: Vec::new(),
        top_songs: vec![SongUsageRow {
            song_id: "s1".into(),
            title: "Cornerstone".into(),
            usage_count: 9,
            last_used_at: None,
        }],
    };
    let store = AnalyticsStore::new(api);

    store.load().await.unwrap();

    assert!(store.summary.get().is_some());
    let insights = store.insights.get();
    assert!(insights.iter().any(|l| l.contains("never been used")));
    assert!(insights.iter().any(|l| l.contains("Cornerstone")));
    assert!(insights.len() <= 5);
}

#[tokio::test]
async fn export_failure_clears_flag_and_sets_error() {
    let api = Arc::new(MockAnalyticsApi::default());
    api.fail_with(ApiError::Other("Export failed".into()));
    let store = AnalyticsStore::new(api);

    let result = store.export_data("songs").await;

    assert!(result.is_err());
    assert!(!store.export_loading.get());
    assert_eq!(store.error.get().as_deref(), Some("Export failed"));
}

#[tokio::test]
async fn export_success_returns_bytes_and_leaves_no_error() {
    let api = Arc::new(MockAnalyticsApi::default());
    *api.export_body.lock().unwrap() = b"id,title\ns1,Cornerstone\n".to_vec();
    let store = AnalyticsStore::new(api);

    let bytes = store.export_data("songs").await.unwrap();
    assert!(bytes.starts_with(b"id,title"));
    assert!(!store.export_loading.get());
    assert_eq!(store.error.get(), None);
}
