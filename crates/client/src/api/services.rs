use std::sync::Arc;

use async_trait::async_trait;

use models::page::Page;
use models::service::{Service, ServiceFilter, ServiceInput, ServiceSong, ServiceSongInput};

use super::quote;
use crate::error::ApiError;
use crate::records::RecordService;

/// Services (setlists) and their ordered song junctions.
#[async_trait]
pub trait ServicesApi: Send + Sync {
    async fn list(&self, page: u32, per_page: u32, filter: &ServiceFilter) -> Result<Page<Service>, ApiError>;
    async fn get(&self, id: &str) -> Result<Service, ApiError>;
    async fn create(&self, input: &ServiceInput) -> Result<Service, ApiError>;
    async fn update(&self, id: &str, input: &ServiceInput) -> Result<Service, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    /// All junction rows of one service, sorted by `order`.
    async fn list_songs(&self, service_id: &str) -> Result<Vec<ServiceSong>, ApiError>;
    async fn add_song(&self, input: &ServiceSongInput) -> Result<ServiceSong, ApiError>;
    async fn update_song(&self, id: &str, input: &ServiceSongInput) -> Result<ServiceSong, ApiError>;
    async fn remove_song(&self, id: &str) -> Result<(), ApiError>;
}

pub struct HttpServicesApi {
    records: Arc<RecordService>,
}

impl HttpServicesApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

fn filter_expr(filter: &ServiceFilter) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("name ~ {}", quote(search)));
    }
    if let Some(from) = filter.from_date {
        parts.push(format!("service_date >= {}", quote(&from.to_string())));
    }
    if let Some(to) = filter.to_date {
        parts.push(format!("service_date <= {}", quote(&to.to_string())));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" && "))
    }
}

#[async_trait]
impl ServicesApi for HttpServicesApi {
    async fn list(&self, page: u32, per_page: u32, filter: &ServiceFilter) -> Result<Page<Service>, ApiError> {
        let expr = filter_expr(filter);
        self.records
            .get_list("services", page, per_page, expr.as_deref(), Some(&filter.sort))
            .await
    }

    async fn get(&self, id: &str) -> Result<Service, ApiError> {
        self.records.get_one("services", id).await
    }

    async fn create(&self, input: &ServiceInput) -> Result<Service, ApiError> {
        self.records.create("services", input).await
    }

    async fn update(&self, id: &str, input: &ServiceInput) -> Result<Service, ApiError> {
        self.records.update("services", id, input).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.records.delete("services", id).await
    }

    async fn list_songs(&self, service_id: &str) -> Result<Vec<ServiceSong>, ApiError> {
        let filter = format!("service_id = {}", quote(service_id));
        self.records
            .get_full_list("service_songs", Some(&filter), Some("order"))
            .await
    }

    async fn add_song(&self, input: &ServiceSongInput) -> Result<ServiceSong, ApiError> {
        self.records.create("service_songs", input).await
    }

    async fn update_song(&self, id: &str, input: &ServiceSongInput) -> Result<ServiceSong, ApiError> {
        self.records.update("service_songs", id, input).await
    }

    async fn remove_song(&self, id: &str) -> Result<(), ApiError> {
        self.records.delete("service_songs", id).await
    }
}

/// In-memory mock for tests.
pub mod mock {
    use std::sync::Mutex;

    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    pub struct MockServicesApi {
        pub services: Mutex<Vec<Service>>,
        pub service_songs: Mutex<Vec<ServiceSong>>,
        pub fail: Mutex<Option<ApiError>>,
    }

    impl MockServicesApi {
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

    pub fn sample_service(id: &str, name: &str) -> Service {
        let now = Utc::now();
        Service {
            id: id.to_string(),
            church_id: "church1".into(),
            name: name.to_string(),
            service_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            theme: None,
            notes: None,
            created: now,
            updated: now,
        }
    }

    #[async_trait]
    impl ServicesApi for MockServicesApi {
        async fn list(&self, page: u32, per_page: u32, _filter: &ServiceFilter) -> Result<Page<Service>, ApiError> {
            self.check()?;
            let services = self.services.lock().unwrap().clone();
            let total_items = services.len() as u64;
            let total_pages = (total_items as u32).div_ceil(per_page).max(1);
            let start = ((page - 1) * per_page) as usize;
            let items = services.into_iter().skip(start).take(per_page as usize).collect();
            Ok(Page { page, per_page, total_items, total_pages, items })
        }

        async fn get(&self, id: &str) -> Result<Service, ApiError> {
            self.check()?;
            self.services
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Other("Record not found.".into()))
        }

        async fn create(&self, input: &ServiceInput) -> Result<Service, ApiError> {
            self.check()?;
            let mut service = sample_service(&Uuid::new_v4().to_string(), &input.name);
            service.service_date = input.service_date;
            service.theme = input.theme.clone();
            self.services.lock().unwrap().insert(0, service.clone());
            Ok(service)
        }

        async fn update(&self, id: &str, input: &ServiceInput) -> Result<Service, ApiError> {
            self.check()?;
            let mut services = self.services.lock().unwrap();
            let service = services
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| ApiError::Other("Record not found.".into()))?;
            service.name = input.name.clone();
            service.service_date = input.service_date;
            service.updated = Utc::now();
            Ok(service.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.check()?;
            self.services.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }

        async fn list_songs(&self, service_id: &str) -> Result<Vec<ServiceSong>, ApiError> {
            self.check()?;
            let mut rows: Vec<ServiceSong> = self
                .service_songs
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.service_id == service_id)
                .cloned()
                .collect();
            rows.sort_by_key(|r| r.order);
            Ok(rows)
        }

        async fn add_song(&self, input: &ServiceSongInput) -> Result<ServiceSong, ApiError> {
            self.check()?;
            let row = ServiceSong {
                id: Uuid::new_v4().to_string(),
                service_id: input.service_id.clone(),
                song_id: input.song_id.clone(),
                order: input.order,
                key_override: input.key_override.clone(),
                notes: input.notes.clone(),
            };
            self.service_songs.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn update_song(&self, id: &str, input: &ServiceSongInput) -> Result<ServiceSong, ApiError> {
            self.check()?;
            let mut rows = self.service_songs.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| ApiError::Other("Record not found.".into()))?;
            row.order = input.order;
            row.key_override = input.key_override.clone();
            row.notes = input.notes.clone();
            Ok(row.clone())
        }

        async fn remove_song(&self, id: &str) -> Result<(), ApiError> {
            self.check()?;
            self.service_songs.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn date_bounds_render_into_filter() {
        let filter = ServiceFilter {
            search: None,
            from_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            to_date: None,
            sort: "-service_date".into(),
        };
        assert_eq!(filter_expr(&filter).unwrap(), r#"service_date >= "2026-01-01""#);
    }
}
