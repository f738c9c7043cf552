use serde::{Deserialize, Serialize};

/// Action tag carried by every realtime change-feed event.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    Create,
    Update,
    Delete,
}

/// One push notification from the backend: the action and the full current
/// representation of the affected record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordEvent<T> {
    pub action: RecordAction,
    pub record: T,
}

impl<T> RecordEvent<T> {
    pub fn new(action: RecordAction, record: T) -> Self {
        Self { action, record }
    }
}

/// Implemented by every record type held in a list cache.
pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for serde_json::Value {
    fn id(&self) -> &str {
        self.get("id").and_then(|v| v.as_str()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tags_use_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&RecordAction::Create).unwrap(), r#""create""#);
        let a: RecordAction = serde_json::from_str(r#""delete""#).unwrap();
        assert_eq!(a, RecordAction::Delete);
    }

    #[test]
    fn json_value_id_falls_back_to_empty() {
        let v = serde_json::json!({"title": "no id"});
        assert_eq!(v.id(), "");
    }
}
