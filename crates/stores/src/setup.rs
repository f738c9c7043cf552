use std::sync::Arc;

use tracing::{info, instrument};

use client::api::{AnalyticsApi, ChurchApi};
use client::ApiError;
use models::analytics::AnalyticsSummary;

use crate::reactive::Reactive;

/// Status of one quickstart step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Error,
}

/// One named step in the fixed quickstart sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SetupStep {
    pub key: &'static str,
    pub title: &'static str,
    pub optional: bool,
    pub status: StepStatus,
}

fn step(key: &'static str, title: &'static str, optional: bool) -> SetupStep {
    SetupStep { key, title, optional, status: StepStatus::Pending }
}

/// The hard-coded quickstart sequence, in order.
pub fn quickstart_steps() -> Vec<SetupStep> {
    vec![
        step("create_church", "Create your church profile", false),
        step("add_songs", "Add your first songs", false),
        step("plan_service", "Plan your first service", false),
        step("invite_members", "Invite team members", true),
    ]
}

/// First-run wizard: a fixed ordered step list and a cursor. Progress is
/// never persisted; it is re-derived from a fresh status probe on load.
pub struct SetupStore {
    church_api: Arc<dyn ChurchApi>,
    analytics_api: Arc<dyn AnalyticsApi>,
    pub steps: Reactive<Vec<SetupStep>>,
    pub current: Reactive<usize>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl SetupStore {
    pub fn new(church_api: Arc<dyn ChurchApi>, analytics_api: Arc<dyn AnalyticsApi>) -> Arc<Self> {
        Arc::new(Self {
            church_api,
            analytics_api,
            steps: Reactive::new(quickstart_steps()),
            current: Reactive::new(0),
            loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    /// Move the cursor forward, clamped to the last step.
    pub fn advance(&self) {
        let last = self.steps.get().len().saturating_sub(1);
        self.current.update(|c| *c = (*c + 1).min(last));
    }

    /// Move the cursor back, clamped to the first step.
    pub fn retreat(&self) {
        self.current.update(|c| *c = c.saturating_sub(1));
    }

    pub fn mark(&self, key: &str, status: StepStatus) {
        self.steps.update(|steps| {
            if let Some(s) = steps.iter_mut().find(|s| s.key == key) {
                s.status = status;
            }
        });
    }

    /// All non-optional steps completed.
    pub fn is_complete(&self) -> bool {
        self.steps
            .get()
            .iter()
            .filter(|s| !s.optional)
            .all(|s| s.status == StepStatus::Completed)
    }

    /// Re-derive every step's status from a fresh probe and position the
    /// cursor at the first incomplete required step.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use client::api::church::mock::MockChurchApi;
    /// use client::api::insights::mock::MockAnalyticsApi;
    /// use stores::setup::SetupStore;
    /// let store = SetupStore::new(
    ///     Arc::new(MockChurchApi::default()),
    ///     Arc::new(MockAnalyticsApi::default()),
    /// );
    /// tokio_test::block_on(store.refresh()).unwrap();
    /// assert!(!store.is_complete());
    /// ```
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.loading.set(true);
        self.error.set(None);
        let result = async {
            let health = self.church_api.system_status().await?;
            let summary = self.analytics_api.summary().await?;
            Ok::<_, ApiError>((health, summary))
        }
        .await;
        let out = match result {
            Ok((health, summary)) => {
                self.derive(health.provisioned, &summary);
                info!(complete = self.is_complete(), "setup state refreshed");
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

    fn derive(&self, provisioned: bool, summary: &AnalyticsSummary) {
        let done = [
            provisioned,
            summary.total_songs > 0,
            summary.total_services > 0,
            summary.active_members > 1,
        ];
        self.steps.update(|steps| {
            for (s, done) in steps.iter_mut().zip(done) {
                s.status = if done { StepStatus::Completed } else { StepStatus::Pending };
            }
        });
        let first_open = self
            .steps
            .get()
            .iter()
            .position(|s| !s.optional && s.status != StepStatus::Completed)
            .unwrap_or(0);
        self.current.set(first_open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::api::church::mock::MockChurchApi;
    use client::api::insights::mock::MockAnalyticsApi;

    fn store() -> Arc<SetupStore> {
        SetupStore::new(Arc::new(MockChurchApi::default()), Arc::new(MockAnalyticsApi::default()))
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let s = store();
        s.retreat();
        assert_eq!(s.current.get(), 0);
        for _ in 0..10 {
            s.advance();
        }
        assert_eq!(s.current.get(), quickstart_steps().len() - 1);
    }

    #[test]
    fn optional_steps_do_not_block_completion() {
        let s = store();
        s.mark("create_church", StepStatus::Completed);
        s.mark("add_songs", StepStatus::Completed);
        s.mark("plan_service", StepStatus::Completed);
        // invite_members left pending but optional
        assert!(s.is_complete());
    }

    #[test]
    fn error_status_is_not_completion() {
        let s = store();
        s.mark("create_church", StepStatus::Error);
        assert!(!s.is_complete());
    }

    #[tokio::test]
    async fn refresh_derives_from_probe() {
        let church = MockChurchApi::default();
        let analytics = MockAnalyticsApi::default();
        analytics.summary.lock().unwrap().total_songs = 5;
        let s = SetupStore::new(Arc::new(church), Arc::new(analytics));

        s.refresh().await.unwrap();
        let steps = s.steps.get();
        assert_eq!(steps[0].status, StepStatus::Completed); // provisioned
        assert_eq!(steps[1].status, StepStatus::Completed); // songs exist
        assert_eq!(steps[2].status, StepStatus::Pending); // no services yet
        assert_eq!(s.current.get(), 2);
        assert!(!s.is_complete());
    }
}
