use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use client::api::services::mock::{sample_service, MockServicesApi};
use client::api::ServicesApi;
use client::RealtimeHub;
use models::event::{RecordAction, RecordEvent};
use models::service::ServiceSongInput;
use stores::services::ServiceStore;

async fn selected_store() -> (Arc<MockServicesApi>, Arc<ServiceStore>) {
    let api = Arc::new(MockServicesApi::default());
    api.services.lock().unwrap().push(sample_service("svc1", "Sunday Morning"));
    let store = ServiceStore::new(api.clone(), 10);
    store.select("svc1").await.unwrap();
    (api, store)
}

#[tokio::test]
async fn add_song_appends_with_next_order() {
    let (_api, store) = selected_store().await;

    store.add_song("song-a").await.unwrap();
    store.add_song("song-b").await.unwrap();

    let setlist = store.setlist.get();
    assert_eq!(setlist.len(), 2);
    assert_eq!(setlist[0].song_id, "song-a");
    assert_eq!(setlist[0].order, 1);
    assert_eq!(setlist[1].order, 2);
}

#[tokio::test]
async fn move_song_swaps_order_with_neighbor() {
    let (api, store) = selected_store().await;
    store.add_song("song-a").await.unwrap();
    let second = store.add_song("song-b").await.unwrap();

    store.move_song(&second.id, true).await.unwrap();

    let setlist = store.setlist.get();
    assert_eq!(setlist[0].song_id, "song-b");
    assert_eq!(setlist[1].song_id, "song-a");

    // The swap was written through, not just patched locally.
    let rows = api.list_songs("svc1").await.unwrap();
    assert_eq!(rows[0].song_id, "song-b");
}

#[tokio::test]
async fn move_at_boundary_is_a_noop() {
    let (_api, store) = selected_store().await;
    let first = store.add_song("song-a").await.unwrap();
    let before = store.setlist.get();

    store.move_song(&first.id, true).await.unwrap();
    assert_eq!(store.setlist.get(), before);
}

#[tokio::test]
async fn remove_song_splices_locally() {
    let (_api, store) = selected_store().await;
    let row = store.add_song("song-a").await.unwrap();
    store.add_song("song-b").await.unwrap();

    store.remove_song(&row.id).await.unwrap();
    let setlist = store.setlist.get();
    assert_eq!(setlist.len(), 1);
    assert_eq!(setlist[0].song_id, "song-b");
}

#[tokio::test]
async fn scoped_setlist_subscription_resorts_on_create() {
    let (_api, store) = selected_store().await;
    store.add_song("song-a").await.unwrap(); // order 1
    store.add_song("song-c").await.unwrap(); // order 2... then a remote insert at order 2 arrives

    let hub = RealtimeHub::new();
    let _live = store.subscribe_setlist(&hub, "svc1");

    let remote = models::service::ServiceSong {
        id: "remote-row".into(),
        service_id: "svc1".into(),
        song_id: "song-b".into(),
        order: 2,
        key_override: None,
        notes: None,
    };
    hub.publish(
        "service_songs/svc1",
        RecordEvent::new(RecordAction::Create, serde_json::to_value(&remote).unwrap()),
    );

    for _ in 0..50 {
        if store.setlist.get().len() == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let orders: Vec<i32> = store.setlist.get().iter().map(|r| r.order).collect();
    assert_eq!(orders, [1, 2, 2]);
    // Stable sort keeps the earlier order-2 row ahead of the remote one.
    assert_eq!(store.setlist.get()[1].song_id, "song-c");
}

#[tokio::test]
async fn deleting_selected_service_clears_selection() {
    let (_api, store) = selected_store().await;
    store.add_song("song-a").await.unwrap();

    store.delete("svc1").await.unwrap();
    assert!(store.selected.get().is_none());
    assert!(store.setlist.get().is_empty());
}

#[tokio::test]
async fn update_song_reorders_after_patch() {
    let (_api, store) = selected_store().await;
    let a = store.add_song("song-a").await.unwrap();
    store.add_song("song-b").await.unwrap();

    let input = ServiceSongInput {
        service_id: "svc1".into(),
        song_id: "song-a".into(),
        order: 9,
        key_override: Some("A".into()),
        notes: None,
    };
    store.update_song(&a.id, input).await.unwrap();

    let setlist = store.setlist.get();
    assert_eq!(setlist.last().unwrap().song_id, "song-a");
    assert_eq!(setlist.last().unwrap().key_override.as_deref(), Some("A"));
}

#[tokio::test]
async fn create_validates_before_calling_backend() {
    let (_api, store) = selected_store().await;
    let input = models::service::ServiceInput {
        name: "  ".into(),
        service_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        theme: None,
        notes: None,
    };
    assert!(store.create(input).await.is_err());
    assert!(store.error.get().is_some());
}
