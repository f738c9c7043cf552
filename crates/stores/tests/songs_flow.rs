use std::sync::Arc;
use std::time::Duration;

use client::api::songs::mock::{sample_song, MockSongsApi};
use client::RealtimeHub;
use configs::UsageConfig;
use models::event::{RecordAction, RecordEvent};
use models::song::SongFilter;
use stores::songs::SongStore;

fn catalog(n: usize) -> Vec<models::song::Song> {
    (0..n).map(|i| sample_song(&format!("s{i}"), &format!("Grace Song {i}"))).collect()
}

#[tokio::test]
async fn load_page_two_overwrites_pagination_fields() {
    let api = Arc::new(MockSongsApi::with_songs(catalog(25)));
    let store = SongStore::new(api.clone(), 10, UsageConfig::default());

    store.set_filter(SongFilter { search: Some("grace".into()), ..Default::default() });
    store.page.update(|p| p.current_page = 2);
    store.load(false).await.unwrap();

    let page = store.page.get();
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_items, 25);
    assert_eq!(store.songs.get().len(), 10);
    assert!(!store.loading.get());
    assert_eq!(store.error.get(), None);

    // The (page, per_page, filter) triple is forwarded verbatim.
    let (page, per_page, filter) = api.last_query.lock().unwrap().clone().unwrap();
    assert_eq!((page, per_page), (2, 10));
    assert_eq!(filter.search.as_deref(), Some("grace"));
}

#[tokio::test]
async fn out_of_range_page_is_a_noop_without_backend_call() {
    let api = Arc::new(MockSongsApi::with_songs(catalog(25)));
    let store = SongStore::new(api.clone(), 10, UsageConfig::default());
    store.load(true).await.unwrap();

    let calls_before = api.last_query.lock().unwrap().clone();
    let state_before = store.page.get();

    store.go_to_page(0).await.unwrap();
    store.go_to_page(99).await.unwrap();

    assert_eq!(store.page.get(), state_before);
    assert_eq!(*api.last_query.lock().unwrap(), calls_before);
}

#[tokio::test]
async fn clear_filter_resets_the_whole_default_object() {
    let store = SongStore::new(
        Arc::new(MockSongsApi::default()),
        10,
        UsageConfig::default(),
    );
    store.set_filter(SongFilter {
        search: Some("grace".into()),
        key: Some("G".into()),
        tags: vec!["hymn".into()],
        sort: "title".into(),
    });
    store.clear_filter();
    assert_eq!(store.filter.get(), SongFilter::default());
}

#[tokio::test]
async fn realtime_create_prepends_and_bumps_total() {
    let api = Arc::new(MockSongsApi::with_songs(catalog(5)));
    let store = SongStore::new(api, 10, UsageConfig::default());
    store.load(true).await.unwrap();
    assert_eq!(store.page.get().total_items, 5);

    store.apply_event(RecordEvent::new(RecordAction::Create, sample_song("x", "Fresh Song")));

    assert_eq!(store.page.get().total_items, 6);
    assert_eq!(store.songs.get()[0].id, "x");
}

#[tokio::test]
async fn realtime_update_for_unloaded_record_is_silent() {
    let api = Arc::new(MockSongsApi::with_songs(catalog(3)));
    let store = SongStore::new(api, 10, UsageConfig::default());
    store.load(true).await.unwrap();
    let before = store.songs.get();

    store.apply_event(RecordEvent::new(RecordAction::Update, sample_song("not-loaded", "Elsewhere")));

    assert_eq!(store.songs.get(), before);
    assert_eq!(store.error.get(), None);
}

#[tokio::test]
async fn hub_subscription_flows_into_the_store() {
    let api = Arc::new(MockSongsApi::default());
    let store = SongStore::new(api, 10, UsageConfig::default());
    let hub = RealtimeHub::new();
    let _live = store.subscribe(&hub);

    let song = sample_song("rt1", "Pushed Song");
    hub.publish(
        "songs",
        RecordEvent::new(RecordAction::Create, serde_json::to_value(&song).unwrap()),
    );

    // The apply task runs asynchronously; poll briefly.
    for _ in 0..50 {
        if !store.songs.get().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(store.songs.get()[0].id, "rt1");
}

#[tokio::test]
async fn failed_load_surfaces_display_message_and_clears_loading() {
    let api = Arc::new(MockSongsApi::default());
    api.fail_with(client::ApiError::Other("Something broke".into()));
    let store = SongStore::new(api, 10, UsageConfig::default());

    assert!(store.load(true).await.is_err());
    assert!(!store.loading.get());
    assert_eq!(store.error.get().as_deref(), Some("Something broke"));
}
