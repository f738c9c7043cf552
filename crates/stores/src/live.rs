//! Optimistic patching of a held list from backend change-feed events.
//!
//! Every list-backed store funnels its realtime events through
//! [`apply_event`], so the create/update/delete semantics are identical
//! across stores:
//!
//! - `create` inserts at the placement the store chose; duplicate create
//!   events for the same id produce duplicate entries (no dedup).
//! - `update` replaces the matching entry wholesale; an id outside the held
//!   page is silently ignored.
//! - `delete` removes matching entries; removing an absent id is a no-op.
//!
//! No ordering is guaranteed between an initial bulk load and the first
//! event racing it; callers load before subscribing by convention.

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::warn;

use models::event::{HasId, RecordAction, RecordEvent};

/// Where a `create` event lands in the held list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatePlacement {
    Prepend,
    Append,
}

/// What a patch did, so stores can adjust denormalized counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Created,
    Updated,
    Deleted,
    /// Update or delete for an id not in the held list.
    Ignored,
}

/// Apply one event to the held list. Replacement and removal are idempotent;
/// insertion is not.
pub fn apply_event<T: HasId + Clone>(
    list: &mut Vec<T>,
    event: RecordEvent<T>,
    placement: CreatePlacement,
) -> Applied {
    match event.action {
        RecordAction::Create => {
            match placement {
                CreatePlacement::Prepend => list.insert(0, event.record),
                CreatePlacement::Append => list.push(event.record),
            }
            Applied::Created
        }
        RecordAction::Update => {
            let id = event.record.id().to_string();
            match list.iter_mut().find(|item| item.id() == id) {
                Some(slot) => {
                    *slot = event.record;
                    Applied::Updated
                }
                None => Applied::Ignored,
            }
        }
        RecordAction::Delete => {
            let id = event.record.id();
            let before = list.len();
            list.retain(|item| item.id() != id);
            if list.len() < before {
                Applied::Deleted
            } else {
                Applied::Ignored
            }
        }
    }
}

/// A running realtime-apply task. Dropping the handle (or calling
/// [`unsubscribe`](LiveHandle::unsubscribe)) stops the task, which in turn
/// releases the hub subscription.
pub struct LiveHandle {
    task: JoinHandle<()>,
}

impl LiveHandle {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Decode a wire event's record into the store's entity type. Undecodable
/// records are dropped with a warning rather than tearing down the loop.
pub(crate) fn decode_event<T: serde::de::DeserializeOwned>(
    collection: &str,
    event: RecordEvent<Value>,
) -> Option<RecordEvent<T>> {
    match serde_json::from_value(event.record) {
        Ok(record) => Some(RecordEvent::new(event.action, record)),
        Err(e) => {
            warn!(collection, error = %e, "dropping undecodable realtime record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: String,
        body: String,
    }

    impl HasId for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, body: &str) -> Row {
        Row { id: id.into(), body: body.into() }
    }

    #[test]
    fn create_prepends_or_appends() {
        let mut list = vec![row("a", "first")];
        apply_event(&mut list, RecordEvent::new(RecordAction::Create, row("b", "new")), CreatePlacement::Prepend);
        assert_eq!(list[0].id, "b");
        apply_event(&mut list, RecordEvent::new(RecordAction::Create, row("c", "tail")), CreatePlacement::Append);
        assert_eq!(list.last().unwrap().id, "c");
    }

    #[test]
    fn update_replaces_wholesale() {
        let mut list = vec![row("a", "old"), row("b", "keep")];
        let applied =
            apply_event(&mut list, RecordEvent::new(RecordAction::Update, row("a", "new")), CreatePlacement::Prepend);
        assert_eq!(applied, Applied::Updated);
        assert_eq!(list[0].body, "new");
        assert_eq!(list[1].body, "keep");
    }

    #[test]
    fn update_for_absent_id_is_ignored() {
        let mut list = vec![row("a", "x")];
        let snapshot = list.clone();
        let applied =
            apply_event(&mut list, RecordEvent::new(RecordAction::Update, row("zzz", "y")), CreatePlacement::Prepend);
        assert_eq!(applied, Applied::Ignored);
        assert_eq!(list, snapshot);
    }

    #[test]
    fn delete_removes_and_is_idempotent() {
        let mut list = vec![row("a", "x"), row("b", "y")];
        let first =
            apply_event(&mut list, RecordEvent::new(RecordAction::Delete, row("a", "")), CreatePlacement::Prepend);
        assert_eq!(first, Applied::Deleted);
        assert_eq!(list.len(), 1);
        let second =
            apply_event(&mut list, RecordEvent::new(RecordAction::Delete, row("a", "")), CreatePlacement::Prepend);
        assert_eq!(second, Applied::Ignored);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let mut list = vec![row("a", "old")];
        for _ in 0..2 {
            apply_event(&mut list, RecordEvent::new(RecordAction::Update, row("a", "new")), CreatePlacement::Prepend);
        }
        assert_eq!(list, vec![row("a", "new")]);
    }

    #[test]
    fn duplicate_create_is_not_deduplicated() {
        let mut list = Vec::new();
        for _ in 0..2 {
            apply_event(&mut list, RecordEvent::new(RecordAction::Create, row("a", "dup")), CreatePlacement::Prepend);
        }
        assert_eq!(list.len(), 2);
    }
}
