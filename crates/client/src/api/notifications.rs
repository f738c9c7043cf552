use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use models::notification::Notification;
use models::page::Page;

use crate::error::ApiError;
use crate::records::RecordService;

#[async_trait]
pub trait NotificationsApi: Send + Sync {
    async fn list(&self, page: u32, per_page: u32, unread_only: bool) -> Result<Page<Notification>, ApiError>;
    async fn unread_count(&self) -> Result<u64, ApiError>;
    async fn mark_read(&self, id: &str) -> Result<Notification, ApiError>;
    /// Returns how many notifications were marked.
    async fn mark_all_read(&self) -> Result<u64, ApiError>;
}

pub struct HttpNotificationsApi {
    records: Arc<RecordService>,
}

impl HttpNotificationsApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

#[derive(Deserialize)]
struct CountBody {
    count: u64,
}

#[async_trait]
impl NotificationsApi for HttpNotificationsApi {
    async fn list(&self, page: u32, per_page: u32, unread_only: bool) -> Result<Page<Notification>, ApiError> {
        let filter = unread_only.then_some("read = false");
        self.records
            .get_list("notifications", page, per_page, filter, Some("-created"))
            .await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        let body: CountBody = self.records.get_json("/api/worship/notifications/unread-count").await?;
        Ok(body.count)
    }

    async fn mark_read(&self, id: &str) -> Result<Notification, ApiError> {
        self.records.update("notifications", id, &json!({ "read": true })).await
    }

    async fn mark_all_read(&self) -> Result<u64, ApiError> {
        let body: CountBody = self
            .records
            .post_json("/api/worship/notifications/mark-all-read", &json!({}))
            .await?;
        Ok(body.count)
    }
}

/// In-memory mock for tests.
pub mod mock {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    pub fn sample_notification(id: &str, read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            church_id: "church1".into(),
            member_id: "member1".into(),
            title: format!("Notification {id}"),
            body: String::new(),
            read,
            created: Utc::now(),
        }
    }

    #[derive(Default)]
    pub struct MockNotificationsApi {
        pub notifications: Mutex<Vec<Notification>>,
        pub fail: Mutex<Option<ApiError>>,
    }

    impl MockNotificationsApi {
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
    impl NotificationsApi for MockNotificationsApi {
        async fn list(&self, page: u32, per_page: u32, unread_only: bool) -> Result<Page<Notification>, ApiError> {
            self.check()?;
            let matched: Vec<Notification> = self
                .notifications
                .lock()
                .unwrap()
                .iter()
                .filter(|n| !unread_only || !n.read)
                .cloned()
                .collect();
            let total_items = matched.len() as u64;
            let total_pages = (total_items as u32).div_ceil(per_page).max(1);
            let start = ((page - 1) * per_page) as usize;
            let items = matched.into_iter().skip(start).take(per_page as usize).collect();
            Ok(Page { page, per_page, total_items, total_pages, items })
        }

        async fn unread_count(&self) -> Result<u64, ApiError> {
            self.check()?;
            Ok(self.notifications.lock().unwrap().iter().filter(|n| !n.read).count() as u64)
        }

        async fn mark_read(&self, id: &str) -> Result<Notification, ApiError> {
            self.check()?;
            let mut notifications = self.notifications.lock().unwrap();
            let n = notifications
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| ApiError::Other("Record not found.".into()))?;
            n.read = true;
            Ok(n.clone())
        }

        async fn mark_all_read(&self) -> Result<u64, ApiError> {
            self.check()?;
            let mut notifications = self.notifications.lock().unwrap();
            let mut marked = 0;
            for n in notifications.iter_mut().filter(|n| !n.read) {
                n.read = true;
                marked += 1;
            }
            Ok(marked)
        }
    }
}
