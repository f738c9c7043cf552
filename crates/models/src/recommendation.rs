use serde::{Deserialize, Serialize};

/// A backend-computed song suggestion; the client only selects the top N.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub song_id: String,
    pub title: String,
    /// Higher is a stronger suggestion; scale is backend-defined.
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}
