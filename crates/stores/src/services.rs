use std::sync::Arc;

use tracing::{debug, info, instrument};

use client::api::ServicesApi;
use client::{ApiError, RealtimeHub};
use models::event::RecordEvent;
use models::service::{Service, ServiceFilter, ServiceInput, ServiceSong, ServiceSongInput};

use crate::live::{apply_event, decode_event, Applied, CreatePlacement, LiveHandle};
use crate::pagination::PageState;
use crate::reactive::Reactive;

/// Services list plus the currently selected service's ordered setlist.
///
/// The setlist order is a client-visible integer re-sorted after any local
/// mutation; gaps are never compacted and conflicts are last-write-wins.
pub struct ServiceStore {
    api: Arc<dyn ServicesApi>,
    pub services: Reactive<Vec<Service>>,
    pub filter: Reactive<ServiceFilter>,
    pub page: Reactive<PageState>,
    pub selected: Reactive<Option<Service>>,
    pub setlist: Reactive<Vec<ServiceSong>>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

fn resort(list: &mut Vec<ServiceSong>) {
    list.sort_by_key(|row| row.order);
}

fn to_input(row: &ServiceSong) -> ServiceSongInput {
    ServiceSongInput {
        service_id: row.service_id.clone(),
        song_id: row.song_id.clone(),
        order: row.order,
        key_override: row.key_override.clone(),
        notes: row.notes.clone(),
    }
}

impl ServiceStore {
    pub fn new(api: Arc<dyn ServicesApi>, per_page: u32) -> Arc<Self> {
        Arc::new(Self {
            api,
            services: Reactive::new(Vec::new()),
            filter: Reactive::new(ServiceFilter::default()),
            page: Reactive::new(PageState::new(per_page)),
            selected: Reactive::new(None),
            setlist: Reactive::new(Vec::new()),
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
        let filter = self.filter.get();
        let result = self.api.list(state.current_page, state.per_page, &filter).await;
        let out = match result {
            Ok(page) => {
                self.page.update(|p| p.absorb(page.page, page.total_items, page.total_pages));
                self.services.set(page.items);
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

    pub fn clear_filter(&self) {
        self.filter.set(ServiceFilter::default());
    }

    /// Load one service and its setlist, already sorted by `order`.
    #[instrument(skip(self), fields(service_id = id))]
    pub async fn select(&self, id: &str) -> Result<(), ApiError> {
        self.loading.set(true);
        self.error.set(None);
        let result = async {
            let service = self.api.get(id).await?;
            let mut setlist = self.api.list_songs(id).await?;
            resort(&mut setlist);
            Ok::<_, ApiError>((service, setlist))
        }
        .await;
        let out = match result {
            Ok((service, setlist)) => {
                debug!(songs = setlist.len(), "service selected");
                self.selected.set(Some(service));
                self.setlist.set(setlist);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ServiceInput) -> Result<Service, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let service = self.api.create(&input).await.map_err(|e| self.fail(e))?;
        info!(service_id = %service.id, "service created");
        self.services.update(|list| list.insert(0, service.clone()));
        self.page.update(|p| p.total_items += 1);
        Ok(service)
    }

    pub async fn update(&self, id: &str, input: ServiceInput) -> Result<Service, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let service = self.api.update(id, &input).await.map_err(|e| self.fail(e))?;
        self.services.update(|list| {
            if let Some(slot) = list.iter_mut().find(|s| s.id == service.id) {
                *slot = service.clone();
            }
        });
        if self.selected.get().is_some_and(|s| s.id == service.id) {
            self.selected.set(Some(service.clone()));
        }
        Ok(service)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.error.set(None);
        self.api.delete(id).await.map_err(|e| self.fail(e))?;
        self.services.update(|list| list.retain(|s| s.id != id));
        self.page.update(|p| p.total_items = p.total_items.saturating_sub(1));
        if self.selected.get().is_some_and(|s| s.id == id) {
            self.selected.set(None);
            self.setlist.set(Vec::new());
        }
        Ok(())
    }

    fn next_order(&self) -> i32 {
        self.setlist.get().iter().map(|r| r.order).max().unwrap_or(0) + 1
    }

    /// Append a song to the selected service's setlist.
    #[instrument(skip(self))]
    pub async fn add_song(&self, song_id: &str) -> Result<ServiceSong, ApiError> {
        self.error.set(None);
        let service = self
            .selected
            .get()
            .ok_or_else(|| ApiError::Other("No service selected.".into()))
            .map_err(|e| self.fail(e))?;
        let input = ServiceSongInput {
            service_id: service.id.clone(),
            song_id: song_id.to_string(),
            order: self.next_order(),
            key_override: None,
            notes: None,
        };
        let row = self.api.add_song(&input).await.map_err(|e| self.fail(e))?;
        self.setlist.update(|list| {
            list.push(row.clone());
            resort(list);
        });
        Ok(row)
    }

    pub async fn update_song(&self, id: &str, input: ServiceSongInput) -> Result<ServiceSong, ApiError> {
        self.error.set(None);
        let row = self.api.update_song(id, &input).await.map_err(|e| self.fail(e))?;
        self.setlist.update(|list| {
            if let Some(slot) = list.iter_mut().find(|r| r.id == row.id) {
                *slot = row.clone();
            }
            resort(list);
        });
        Ok(row)
    }

    pub async fn remove_song(&self, id: &str) -> Result<(), ApiError> {
        self.error.set(None);
        self.api.remove_song(id).await.map_err(|e| self.fail(e))?;
        self.setlist.update(|list| list.retain(|r| r.id != id));
        Ok(())
    }

    /// Swap order with the neighbor above (`up = true`) or below. Boundary
    /// moves are no-ops. The two updates are independent requests; there is
    /// no transaction, so a race leaves whichever write landed last.
    #[instrument(skip(self), fields(row_id = id))]
    pub async fn move_song(&self, id: &str, up: bool) -> Result<(), ApiError> {
        self.error.set(None);
        let list = self.setlist.get();
        let Some(idx) = list.iter().position(|r| r.id == id) else {
            return Ok(());
        };
        let neighbor_idx = if up {
            match idx.checked_sub(1) {
                Some(i) => i,
                None => return Ok(()),
            }
        } else {
            if idx + 1 >= list.len() {
                return Ok(());
            }
            idx + 1
        };

        let mut moved = list[idx].clone();
        let mut neighbor = list[neighbor_idx].clone();
        std::mem::swap(&mut moved.order, &mut neighbor.order);

        let moved_row = self.api.update_song(&moved.id, &to_input(&moved)).await.map_err(|e| self.fail(e))?;
        let neighbor_row =
            self.api.update_song(&neighbor.id, &to_input(&neighbor)).await.map_err(|e| self.fail(e))?;

        self.setlist.update(|rows| {
            for updated in [&moved_row, &neighbor_row] {
                if let Some(slot) = rows.iter_mut().find(|r| r.id == updated.id) {
                    *slot = updated.clone();
                }
            }
            resort(rows);
        });
        Ok(())
    }

    /// Patch the services list from the change feed.
    pub fn apply_event(&self, event: RecordEvent<Service>) {
        let mut applied = Applied::Ignored;
        self.services.update(|list| {
            applied = apply_event(list, event, CreatePlacement::Prepend);
        });
        match applied {
            Applied::Created => self.page.update(|p| p.total_items += 1),
            Applied::Deleted => self.page.update(|p| p.total_items = p.total_items.saturating_sub(1)),
            Applied::Updated | Applied::Ignored => {}
        }
    }

    /// Patch the selected setlist; order-sensitive, so every create/update
    /// re-sorts afterward.
    pub fn apply_setlist_event(&self, event: RecordEvent<ServiceSong>) {
        self.setlist.update(|list| {
            let applied = apply_event(list, event, CreatePlacement::Append);
            if matches!(applied, Applied::Created | Applied::Updated) {
                resort(list);
            }
        });
    }

    pub fn subscribe(self: &Arc<Self>, hub: &Arc<RealtimeHub>) -> LiveHandle {
        let mut sub = hub.subscribe("services");
        let store = Arc::clone(self);
        LiveHandle::new(tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if let Some(event) = decode_event::<Service>("services", event) {
                    store.apply_event(event);
                }
            }
        }))
    }

    /// Subscribe to the change feed of one service's setlist, scoped by
    /// parent id in the topic name.
    pub fn subscribe_setlist(self: &Arc<Self>, hub: &Arc<RealtimeHub>, service_id: &str) -> LiveHandle {
        let mut sub = hub.subscribe(&format!("service_songs/{service_id}"));
        let store = Arc::clone(self);
        LiveHandle::new(tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if let Some(event) = decode_event::<ServiceSong>("service_songs", event) {
                    store.apply_setlist_event(event);
                }
            }
        }))
    }
}
