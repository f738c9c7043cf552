//! One trait per domain, in the repository style: an HTTP implementation
//! backed by [`RecordService`](crate::RecordService) and a `mock` module for
//! tests and doc examples.

pub mod church;
pub mod insights;
pub mod notifications;
pub mod people;
pub mod services;
pub mod songs;

pub use church::ChurchApi;
pub use insights::{AnalyticsApi, RecommendationsApi};
pub use notifications::NotificationsApi;
pub use people::{MembersApi, RolesApi, SkillsApi};
pub use services::ServicesApi;
pub use songs::SongsApi;

/// Escape a user-supplied value for interpolation into a backend filter
/// expression.
pub(crate) fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::quote;

    #[test]
    fn quote_escapes_embedded_quotes() {
        assert_eq!(quote(r#"10,000 "Reasons""#), r#""10,000 \"Reasons\"""#);
    }
}
