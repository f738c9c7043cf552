use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use client::api::SongsApi;
use client::{ApiError, RealtimeHub};
use configs::UsageConfig;
use models::event::RecordEvent;
use models::song::{Rating, RatingInput, Song, SongFilter, SongInput};
use models::usage::{days_since, usage_status, UsageStatus};

use crate::live::{apply_event, decode_event, Applied, CreatePlacement, LiveHandle};
use crate::pagination::PageState;
use crate::reactive::Reactive;

/// Song catalog: one page of songs plus filter, pagination, and realtime
/// patching state.
pub struct SongStore {
    api: Arc<dyn SongsApi>,
    usage: UsageConfig,
    pub songs: Reactive<Vec<Song>>,
    pub filter: Reactive<SongFilter>,
    pub page: Reactive<PageState>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl SongStore {
    pub fn new(api: Arc<dyn SongsApi>, per_page: u32, usage: UsageConfig) -> Arc<Self> {
        Arc::new(Self {
            api,
            usage,
            songs: Reactive::new(Vec::new()),
            filter: Reactive::new(SongFilter::default()),
            page: Reactive::new(PageState::new(per_page)),
            loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    fn fail(&self, e: ApiError) -> ApiError {
        self.error.set(Some(e.display_message()));
        e
    }

    /// Fetch the current (page, per_page, filter) triple and overwrite the
    /// held list and pagination fields from the response.
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
                debug!(page = page.page, total = page.total_items, "songs loaded");
                self.songs.set(page.items);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    /// No-op (no backend call, no state change) when `page` is out of range.
    pub async fn go_to_page(&self, page: u32) -> Result<(), ApiError> {
        if !self.page.get().in_range(page) {
            return Ok(());
        }
        self.page.update(|p| p.current_page = page);
        self.load(false).await
    }

    pub fn set_filter(&self, filter: SongFilter) {
        self.filter.set(filter);
    }

    /// Reset to exactly the default filter, not a partial merge.
    pub fn clear_filter(&self) {
        self.filter.set(SongFilter::default());
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: SongInput) -> Result<Song, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let song = self.api.create(&input).await.map_err(|e| self.fail(e))?;
        info!(song_id = %song.id, "song created");
        self.songs.update(|list| list.insert(0, song.clone()));
        self.page.update(|p| p.total_items += 1);
        Ok(song)
    }

    #[instrument(skip(self, input), fields(song_id = id))]
    pub async fn update(&self, id: &str, input: SongInput) -> Result<Song, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let song = self.api.update(id, &input).await.map_err(|e| self.fail(e))?;
        self.songs.update(|list| {
            if let Some(slot) = list.iter_mut().find(|s| s.id == song.id) {
                *slot = song.clone();
            }
        });
        Ok(song)
    }

    #[instrument(skip(self), fields(song_id = id))]
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.error.set(None);
        self.api.delete(id).await.map_err(|e| self.fail(e))?;
        info!(song_id = id, "song deleted");
        self.songs.update(|list| list.retain(|s| s.id != id));
        self.page.update(|p| p.total_items = p.total_items.saturating_sub(1));
        Ok(())
    }

    pub async fn rate(&self, input: RatingInput) -> Result<Rating, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        self.api.rate(&input).await.map_err(|e| self.fail(e))
    }

    /// Classify a song by days since its last use (14/180-day thresholds by
    /// default; never used counts as stale).
    pub fn usage_status_of(&self, song: &Song) -> UsageStatus {
        let days = days_since(song.last_used_at, Utc::now());
        usage_status(days, self.usage.recent_days, self.usage.stale_days)
    }

    /// Patch the held list from one change-feed event and adjust the total
    /// count defensively (floor of zero on deletes).
    pub fn apply_event(&self, event: RecordEvent<Song>) {
        let mut applied = Applied::Ignored;
        self.songs.update(|list| {
            applied = apply_event(list, event, CreatePlacement::Prepend);
        });
        match applied {
            Applied::Created => self.page.update(|p| p.total_items += 1),
            Applied::Deleted => self.page.update(|p| p.total_items = p.total_items.saturating_sub(1)),
            Applied::Updated | Applied::Ignored => {}
        }
    }

    /// Wire the store to the change feed. One subscription per store
    /// instance; callers bulk-load first by convention.
    pub fn subscribe(self: &Arc<Self>, hub: &Arc<RealtimeHub>) -> LiveHandle {
        let mut sub = hub.subscribe("songs");
        let store = Arc::clone(self);
        LiveHandle::new(tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if let Some(event) = decode_event::<Song>("songs", event) {
                    store.apply_event(event);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::api::songs::mock::{sample_song, MockSongsApi};

    fn store_with(songs: Vec<Song>) -> Arc<SongStore> {
        SongStore::new(Arc::new(MockSongsApi::with_songs(songs)), 10, UsageConfig::default())
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_calling_backend() {
        let store = store_with(vec![]);
        let input = SongInput {
            title: " ".into(),
            artist: String::new(),
            ccli_number: None,
            key: None,
            tempo: None,
            tags: vec![],
            lyrics: None,
        };
        assert!(store.create(input).await.is_err());
        assert!(store.error.get().is_some());
        assert!(store.songs.get().is_empty());
    }

    #[tokio::test]
    async fn usage_status_uses_configured_thresholds() {
        let store = store_with(vec![]);
        let mut song = sample_song("s1", "Oceans");
        song.last_used_at = Some(Utc::now() - chrono::Duration::days(3));
        assert_eq!(store.usage_status_of(&song), UsageStatus::Recent);
        song.last_used_at = None;
        assert_eq!(store.usage_status_of(&song), UsageStatus::Stale);
    }
}
