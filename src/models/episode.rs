//! Episode and season structures.

use serde::{Deserialize, Serialize};

/// One playable unit (episode, chapter or the single feature of a movie).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    /// Ordinal; fractional values are meaningful (e.g. `.5` alternate cuts)
    pub episode_number: f32,

    pub display_name: String,

    /// Site-relative path of the episode's own resource
    pub path: String,

    /// Epoch millis, `0` when unknown
    #[serde(default)]
    pub upload_timestamp: i64,
}

impl Episode {
    pub fn new(episode_number: f32, display_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            episode_number,
            display_name: display_name.into(),
            path: path.into(),
            upload_timestamp: 0,
        }
    }
}

/// A season group found while aggregating. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub display_name: String,
    pub episodes: Vec<Episode>,
}
