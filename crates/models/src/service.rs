use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::event::HasId;

/// A planned worship service (one setlist).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub church_id: String,
    pub name: String,
    pub service_date: NaiveDate,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl HasId for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Junction row placing a song at a position within a service.
///
/// `order` is a client-visible integer re-sorted after any local mutation;
/// gaps are left as-is and never compacted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceSong {
    pub id: String,
    pub service_id: String,
    pub song_id: String,
    pub order: i32,
    #[serde(default)]
    pub key_override: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl HasId for ServiceSong {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceInput {
    pub name: String,
    pub service_date: NaiveDate,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ServiceInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("service name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceSongInput {
    pub service_id: String,
    pub song_id: String,
    pub order: i32,
    #[serde(default)]
    pub key_override: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceFilter {
    #[serde(default)]
    pub search: Option<String>,
    /// Only services on or after this date.
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    /// Only services on or before this date.
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default = "ServiceFilter::default_sort")]
    pub sort: String,
}

impl ServiceFilter {
    fn default_sort() -> String {
        "-service_date".into()
    }
}

impl Default for ServiceFilter {
    fn default() -> Self {
        Self { search: None, from_date: None, to_date: None, sort: Self::default_sort() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn input_requires_name() {
        let input = ServiceInput {
            name: "".into(),
            service_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            theme: None,
            notes: None,
        };
        assert!(input.validate().is_err());
    }
}
