use std::sync::Arc;

use async_trait::async_trait;

use models::page::Page;
use models::song::{Rating, RatingInput, Song, SongFilter, SongInput};

use super::quote;
use crate::error::ApiError;
use crate::records::RecordService;

/// Catalog access for the songs collection.
#[async_trait]
pub trait SongsApi: Send + Sync {
    async fn list(&self, page: u32, per_page: u32, filter: &SongFilter) -> Result<Page<Song>, ApiError>;
    async fn create(&self, input: &SongInput) -> Result<Song, ApiError>;
    async fn update(&self, id: &str, input: &SongInput) -> Result<Song, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
    async fn rate(&self, input: &RatingInput) -> Result<Rating, ApiError>;
}

pub struct HttpSongsApi {
    records: Arc<RecordService>,
}

impl HttpSongsApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

/// Render the flat filter record into one AND-combined backend expression.
fn filter_expr(filter: &SongFilter) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let q = quote(search);
        parts.push(format!("(title ~ {q} || artist ~ {q})"));
    }
    if let Some(key) = filter.key.as_deref().filter(|k| !k.is_empty()) {
        parts.push(format!("key = {}", quote(key)));
    }
    for tag in &filter.tags {
        parts.push(format!("tags ~ {}", quote(tag)));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" && "))
    }
}

#[async_trait]
impl SongsApi for HttpSongsApi {
    async fn list(&self, page: u32, per_page: u32, filter: &SongFilter) -> Result<Page<Song>, ApiError> {
        let expr = filter_expr(filter);
        self.records
            .get_list("songs", page, per_page, expr.as_deref(), Some(&filter.sort))
            .await
    }

    async fn create(&self, input: &SongInput) -> Result<Song, ApiError> {
        self.records.create("songs", input).await
    }

    async fn update(&self, id: &str, input: &SongInput) -> Result<Song, ApiError> {
        self.records.update("songs", id, input).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.records.delete("songs", id).await
    }

    async fn rate(&self, input: &RatingInput) -> Result<Rating, ApiError> {
        self.records.create("ratings", input).await
    }
}

/// In-memory mock for tests and doc examples.
pub mod mock {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    pub struct MockSongsApi {
        pub songs: Mutex<Vec<Song>>,
        /// When set, every call fails with this error.
        pub fail: Mutex<Option<ApiError>>,
        /// Last (page, per_page, filter) triple the store forwarded.
        pub last_query: Mutex<Option<(u32, u32, SongFilter)>>,
    }

    impl MockSongsApi {
        /// # Examples
        /// ```
        /// use client::api::songs::{SongsApi, mock::{sample_song, MockSongsApi}};
        /// use models::song::SongFilter;
        /// let api = MockSongsApi::with_songs(vec![sample_song("s1", "Oceans")]);
        /// let page = tokio_test::block_on(api.list(1, 20, &SongFilter::default())).unwrap();
        /// assert_eq!(page.total_items, 1);
        /// ```
        pub fn with_songs(songs: Vec<Song>) -> Self {
            Self { songs: Mutex::new(songs), ..Default::default() }
        }

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

    pub fn sample_song(id: &str, title: &str) -> Song {
        let now = Utc::now();
        Song {
            id: id.to_string(),
            church_id: "church1".into(),
            title: title.to_string(),
            artist: String::new(),
            ccli_number: None,
            key: None,
            tempo: None,
            tags: Vec::new(),
            lyrics: None,
            last_used_at: None,
            usage_count: 0,
            created: now,
            updated: now,
        }
    }

    #[async_trait]
    impl SongsApi for MockSongsApi {
        async fn list(&self, page: u32, per_page: u32, filter: &SongFilter) -> Result<Page<Song>, ApiError> {
            self.check()?;
            *self.last_query.lock().unwrap() = Some((page, per_page, filter.clone()));
            let songs = self.songs.lock().unwrap();
            let matched: Vec<Song> = songs
                .iter()
                .filter(|s| match filter.search.as_deref() {
                    Some(q) => s.title.to_lowercase().contains(&q.to_lowercase()),
                    None => true,
                })
                .cloned()
                .collect();
            let total_items = matched.len() as u64;
            let total_pages = (total_items as u32).div_ceil(per_page).max(1);
            let start = ((page - 1) * per_page) as usize;
            let items = matched.into_iter().skip(start).take(per_page as usize).collect();
            Ok(Page { page, per_page, total_items, total_pages, items })
        }

        async fn create(&self, input: &SongInput) -> Result<Song, ApiError> {
            self.check()?;
            let mut song = sample_song(&Uuid::new_v4().to_string(), &input.title);
            song.artist = input.artist.clone();
            song.key = input.key.clone();
            song.tags = input.tags.clone();
            self.songs.lock().unwrap().insert(0, song.clone());
            Ok(song)
        }

        async fn update(&self, id: &str, input: &SongInput) -> Result<Song, ApiError> {
            self.check()?;
            let mut songs = self.songs.lock().unwrap();
            let song = songs
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| ApiError::Other("Record not found.".into()))?;
            song.title = input.title.clone();
            song.artist = input.artist.clone();
            song.key = input.key.clone();
            song.updated = Utc::now();
            Ok(song.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.check()?;
            self.songs.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }

        async fn rate(&self, input: &RatingInput) -> Result<Rating, ApiError> {
            self.check()?;
            Ok(Rating {
                id: Uuid::new_v4().to_string(),
                song_id: input.song_id.clone(),
                member_id: "member1".into(),
                value: input.value,
                created: Utc::now(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_renders_no_expression() {
        assert_eq!(filter_expr(&SongFilter::default()), None);
    }

    #[test]
    fn criteria_join_with_and() {
        let filter = SongFilter {
            search: Some("grace".into()),
            key: Some("G".into()),
            tags: vec!["hymn".into()],
            sort: "-created".into(),
        };
        assert_eq!(
            filter_expr(&filter).unwrap(),
            r#"(title ~ "grace" || artist ~ "grace") && key = "G" && tags ~ "hymn""#
        );
    }
}
