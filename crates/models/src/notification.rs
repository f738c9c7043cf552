use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::HasId;

/// An in-app notification addressed to one member.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub church_id: String,
    pub member_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub created: DateTime<Utc>,
}

impl HasId for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}
