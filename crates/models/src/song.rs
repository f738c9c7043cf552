use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::event::HasId;

/// A song in the church's catalog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: String,
    pub church_id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub ccli_number: Option<String>,
    /// Musical key, e.g. "G" or "Bm".
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub tempo: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    /// When the song last appeared in a completed service; `None` = never used.
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_count: u32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl HasId for Song {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update input: no id/timestamps, those are backend-generated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SongInput {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub ccli_number: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub tempo: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl SongInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("song title must not be empty".into()));
        }
        if let Some(tempo) = self.tempo {
            if !(20..=300).contains(&tempo) {
                return Err(ModelError::Validation("tempo must be in 20..=300 bpm".into()));
            }
        }
        Ok(())
    }
}

/// Flat optional criteria forwarded to the backend query, combined server-side
/// with logical AND. No filter logic lives on the client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SongFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "SongFilter::default_sort")]
    pub sort: String,
}

impl SongFilter {
    fn default_sort() -> String {
        "-created".into()
    }
}

impl Default for SongFilter {
    fn default() -> Self {
        Self { search: None, key: None, tags: Vec::new(), sort: Self::default_sort() }
    }
}

/// A member's 1-5 rating of a song.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub id: String,
    pub song_id: String,
    pub member_id: String,
    pub value: u8,
    pub created: DateTime<Utc>,
}

impl HasId for Rating {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RatingInput {
    pub song_id: String,
    pub value: u8,
}

impl RatingInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(1..=5).contains(&self.value) {
            return Err(ModelError::Validation("rating must be in 1..=5".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_rejects_blank_title() {
        let input = SongInput {
            title: "   ".into(),
            artist: String::new(),
            ccli_number: None,
            key: None,
            tempo: None,
            tags: vec![],
            lyrics: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn input_rejects_absurd_tempo() {
        let input = SongInput {
            title: "Amazing Grace".into(),
            artist: String::new(),
            ccli_number: None,
            key: Some("G".into()),
            tempo: Some(900),
            tags: vec![],
            lyrics: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn rating_bounds() {
        assert!(RatingInput { song_id: "s1".into(), value: 0 }.validate().is_err());
        assert!(RatingInput { song_id: "s1".into(), value: 5 }.validate().is_ok());
        assert!(RatingInput { song_id: "s1".into(), value: 6 }.validate().is_err());
    }

    #[test]
    fn default_filter_sorts_by_newest() {
        assert_eq!(SongFilter::default().sort, "-created");
    }
}
