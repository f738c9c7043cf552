use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-song usage figures inside an analytics summary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SongUsageRow {
    pub song_id: String,
    pub title: String,
    pub usage_count: u32,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// One trend period (e.g. a month) of planning activity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    /// Period label, e.g. "2026-07".
    pub period: String,
    pub services: u32,
    pub distinct_songs: u32,
}

/// Aggregates computed server-side and fetched wholesale; this layer only
/// derives presentation strings from them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct AnalyticsSummary {
    pub total_songs: u64,
    pub total_services: u64,
    pub active_members: u64,
    pub songs_added_last_30_days: u64,
    #[serde(default)]
    pub never_used_songs: u64,
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
    #[serde(default)]
    pub top_songs: Vec<SongUsageRow>,
}
