use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use models::event::RecordEvent;

/// In-process fan-out of the backend change feed.
///
/// The wire transport (SSE/websocket) is owned by the embedding application,
/// which feeds decoded events into [`RealtimeHub::publish`]. Stores subscribe
/// by topic: a plain collection name (`"songs"`), or a parent-scoped topic
/// such as `"service_songs/<service_id>"`.
pub struct RealtimeHub {
    topics: DashMap<String, Vec<(u64, mpsc::UnboundedSender<RecordEvent<Value>>)>>,
    next_id: AtomicU64,
}

impl RealtimeHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { topics: DashMap::new(), next_id: AtomicU64::new(1) })
    }

    /// Register a subscriber. Exactly one subscription per store instance is
    /// the expected usage; the hub does not deduplicate.
    pub fn subscribe(self: &Arc<Self>, topic: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.topics.entry(topic.to_string()).or_default().push((id, tx));
        debug!(topic, id, "realtime subscribe");
        Subscription { hub: Arc::clone(self), topic: topic.to_string(), id, rx }
    }

    /// Deliver one event to every current subscriber of the topic.
    /// Closed receivers are pruned as a side effect.
    pub fn publish(&self, topic: &str, event: RecordEvent<Value>) {
        if let Some(mut subs) = self.topics.get_mut(topic) {
            subs.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        }
    }

    fn unsubscribe(&self, topic: &str, id: u64) {
        if let Some(mut subs) = self.topics.get_mut(topic) {
            subs.retain(|(sub_id, _)| *sub_id != id);
        }
        debug!(topic, id, "realtime unsubscribe");
    }

    #[cfg(test)]
    fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map(|s| s.len()).unwrap_or(0)
    }
}

/// A live registration on one topic. Dropping it unsubscribes.
pub struct Subscription {
    hub: Arc<RealtimeHub>,
    topic: String,
    id: u64,
    rx: mpsc::UnboundedReceiver<RecordEvent<Value>>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<RecordEvent<Value>> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(&self.topic, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::event::RecordAction;
    use serde_json::json;

    #[tokio::test]
    async fn publish_reaches_topic_subscribers_only() {
        let hub = RealtimeHub::new();
        let mut songs = hub.subscribe("songs");
        let _services = hub.subscribe("services");

        hub.publish("songs", RecordEvent::new(RecordAction::Create, json!({"id": "s1"})));
        let ev = songs.recv().await.unwrap();
        assert_eq!(ev.action, RecordAction::Create);
        assert_eq!(ev.record["id"], "s1");
    }

    #[tokio::test]
    async fn drop_unsubscribes() {
        let hub = RealtimeHub::new();
        let sub = hub.subscribe("songs");
        assert_eq!(hub.subscriber_count("songs"), 1);
        drop(sub);
        assert_eq!(hub.subscriber_count("songs"), 0);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = RealtimeHub::new();
        hub.publish("songs", RecordEvent::new(RecordAction::Delete, json!({"id": "gone"})));
    }
}
