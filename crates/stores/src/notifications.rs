use std::sync::Arc;

use tracing::{info, instrument};

use client::api::NotificationsApi;
use client::{ApiError, RealtimeHub};
use models::event::{RecordAction, RecordEvent};
use models::notification::Notification;

use crate::live::{apply_event, decode_event, Applied, CreatePlacement, LiveHandle};
use crate::pagination::PageState;
use crate::reactive::Reactive;

/// Notification inbox with a denormalized unread counter.
///
/// The counter is adjusted defensively: increments only for events actually
/// applied, decrements floored at zero.
pub struct NotificationStore {
    api: Arc<dyn NotificationsApi>,
    pub notifications: Reactive<Vec<Notification>>,
    pub unread_count: Reactive<u64>,
    pub unread_only: Reactive<bool>,
    pub page: Reactive<PageState>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl NotificationStore {
    pub fn new(api: Arc<dyn NotificationsApi>, per_page: u32) -> Arc<Self> {
        Arc::new(Self {
            api,
            notifications: Reactive::new(Vec::new()),
            unread_count: Reactive::new(0),
            unread_only: Reactive::new(false),
            page: Reactive::new(PageState::new(per_page)),
            loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    fn fail(&self, e: ApiError) -> ApiError {
        self.error.set(Some(e.display_message()));
        e
    }

    #[instrument(skip(self))]
    pub async fn load(&self, reset_page: bool) -> Result<(), ApiError> {
        if reset_page {
            self.page.update(|p| p.current_page = 1);
        }
        self.loading.set(true);
        self.error.set(None);
        let state = self.page.get();
        let unread_only = self.unread_only.get();
        let result = self.api.list(state.current_page, state.per_page, unread_only).await;
        let out = match result {
            Ok(page) => {
                self.page.update(|p| p.absorb(page.page, page.total_items, page.total_pages));
                self.notifications.set(page.items);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    pub async fn go_to_page(&self, page: u32) -> Result<(), ApiError> {
        if !self.page.get().in_range(page) {
            return Ok(());
        }
        self.page.update(|p| p.current_page = page);
        self.load(false).await
    }

    /// Re-fetch the authoritative unread count.
    pub async fn refresh_unread(&self) -> Result<(), ApiError> {
        let count = self.api.unread_count().await.map_err(|e| self.fail(e))?;
        self.unread_count.set(count);
        Ok(())
    }

    #[instrument(skip(self), fields(notification_id = id))]
    pub async fn mark_read(&self, id: &str) -> Result<(), ApiError> {
        self.error.set(None);
        let was_unread = self.notifications.get().iter().any(|n| n.id == id && !n.read);
        let updated = self.api.mark_read(id).await.map_err(|e| self.fail(e))?;
        self.notifications.update(|list| {
            if let Some(slot) = list.iter_mut().find(|n| n.id == updated.id) {
                *slot = updated.clone();
            }
        });
        if was_unread {
            self.unread_count.update(|c| *c = c.saturating_sub(1));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.error.set(None);
        let marked = self.api.mark_all_read().await.map_err(|e| self.fail(e))?;
        info!(marked, "notifications marked read");
        self.notifications.update(|list| {
            for n in list.iter_mut() {
                n.read = true;
            }
        });
        self.unread_count.set(0);
        Ok(())
    }

    /// Patch the held list and keep the unread counter consistent with what
    /// the patch actually did.
    pub fn apply_event(&self, event: RecordEvent<Notification>) {
        // Snapshot read-state transitions before the list changes.
        let incoming_unread = !event.record.read;
        let previous_unread = self
            .notifications
            .get()
            .iter()
            .find(|n| n.id == event.record.id)
            .map(|n| !n.read);

        let action = event.action;
        let mut applied = Applied::Ignored;
        self.notifications.update(|list| {
            applied = apply_event(list, event, CreatePlacement::Prepend);
        });

        match (action, applied) {
            (RecordAction::Create, Applied::Created) => {
                self.page.update(|p| p.total_items += 1);
                if incoming_unread {
                    self.unread_count.update(|c| *c += 1);
                }
            }
            (RecordAction::Delete, Applied::Deleted) => {
                self.page.update(|p| p.total_items = p.total_items.saturating_sub(1));
                if previous_unread == Some(true) {
                    self.unread_count.update(|c| *c = c.saturating_sub(1));
                }
            }
            (RecordAction::Update, Applied::Updated) => match (previous_unread, incoming_unread) {
                (Some(true), false) => self.unread_count.update(|c| *c = c.saturating_sub(1)),
                (Some(false), true) => self.unread_count.update(|c| *c += 1),
                _ => {}
            },
            _ => {}
        }
    }

    pub fn subscribe(self: &Arc<Self>, hub: &Arc<RealtimeHub>) -> LiveHandle {
        let mut sub = hub.subscribe("notifications");
        let store = Arc::clone(self);
        LiveHandle::new(tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if let Some(event) = decode_event::<Notification>("notifications", event) {
                    store.apply_event(event);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::api::notifications::mock::{sample_notification, MockNotificationsApi};

    fn empty_store() -> Arc<NotificationStore> {
        NotificationStore::new(Arc::new(MockNotificationsApi::default()), 10)
    }

    #[test]
    fn delete_for_absent_id_never_goes_negative() {
        let store = empty_store();
        store.apply_event(RecordEvent::new(RecordAction::Delete, sample_notification("ghost", false)));
        assert_eq!(store.unread_count.get(), 0);
        assert_eq!(store.page.get().total_items, 0);
    }

    #[test]
    fn create_bumps_unread_only_when_unread() {
        let store = empty_store();
        store.apply_event(RecordEvent::new(RecordAction::Create, sample_notification("n1", true)));
        assert_eq!(store.unread_count.get(), 0);
        store.apply_event(RecordEvent::new(RecordAction::Create, sample_notification("n2", false)));
        assert_eq!(store.unread_count.get(), 1);
    }

    #[test]
    fn update_transitions_adjust_counter_both_ways() {
        let store = empty_store();
        store.apply_event(RecordEvent::new(RecordAction::Create, sample_notification("n1", false)));
        assert_eq!(store.unread_count.get(), 1);

        store.apply_event(RecordEvent::new(RecordAction::Update, sample_notification("n1", true)));
        assert_eq!(store.unread_count.get(), 0);

        store.apply_event(RecordEvent::new(RecordAction::Update, sample_notification("n1", false)));
        assert_eq!(store.unread_count.get(), 1);
    }
}
