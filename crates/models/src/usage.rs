use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How recently a song has been used in a service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Recent,
    Available,
    Stale,
}

/// Classify by days since last use. `None` means never used and always
/// yields `Stale`. Thresholds come from `configs::UsageConfig`; the
/// canonical defaults are 14 and 180 days.
pub fn usage_status(days_since_last_use: Option<i64>, recent_days: i64, stale_days: i64) -> UsageStatus {
    match days_since_last_use {
        Some(days) if days < recent_days => UsageStatus::Recent,
        Some(days) if days < stale_days => UsageStatus::Available,
        _ => UsageStatus::Stale,
    }
}

/// Whole days elapsed from `last_used_at` to `now`, clamped at zero for
/// timestamps that sit in the future due to clock skew.
pub fn days_since(last_used_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    last_used_at.map(|t| (now - t).num_days().max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn never_used_is_stale() {
        assert_eq!(usage_status(None, 14, 180), UsageStatus::Stale);
    }

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(usage_status(Some(13), 14, 180), UsageStatus::Recent);
        assert_eq!(usage_status(Some(14), 14, 180), UsageStatus::Available);
        assert_eq!(usage_status(Some(179), 14, 180), UsageStatus::Available);
        assert_eq!(usage_status(Some(180), 14, 180), UsageStatus::Stale);
    }

    #[test]
    fn classification_is_monotonic_in_days() {
        let mut last = usage_status(Some(0), 14, 180);
        for days in 1..400 {
            let next = usage_status(Some(days), 14, 180);
            let rank = |s: UsageStatus| match s {
                UsageStatus::Recent => 0,
                UsageStatus::Available => 1,
                UsageStatus::Stale => 2,
            };
            assert!(rank(next) >= rank(last));
            last = next;
        }
    }

    #[test]
    fn future_timestamps_clamp_to_zero_days() {
        let now = Utc::now();
        let future = Some(now + Duration::days(3));
        assert_eq!(days_since(future, now), Some(0));
    }
}
