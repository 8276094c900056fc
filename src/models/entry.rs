//! Catalog entry data structure.

use serde::{Deserialize, Serialize};

/// Publication status of a catalog entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Ongoing,
    Completed,
    #[default]
    Unknown,
}

impl EntryStatus {
    /// Parse the free-text status shown on a details page.
    pub fn parse(text: Option<&str>) -> Self {
        match text.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("completed" | "completo") => Self::Completed,
            Some("ongoing" | "lançamento") => Self::Ongoing,
            _ => Self::Unknown,
        }
    }
}

/// One catalog title (series or movie).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Entry {
    /// Site-relative identifier, the only key used for later fetches
    pub canonical_path: String,

    /// Display title
    pub title: String,

    /// Absolute URL of the cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Synopsis, possibly assembled from several fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Genres in page order
    #[serde(default)]
    pub genres: Vec<String>,

    #[serde(default)]
    pub status: EntryStatus,

    /// Details were already parsed; no automatic refetch is needed
    #[serde(default)]
    pub initialized: bool,
}

impl Entry {
    /// Create an entry with only its identifying fields set.
    pub fn new(canonical_path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            canonical_path: canonical_path.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(EntryStatus::parse(Some(" Completed ")), EntryStatus::Completed);
        assert_eq!(EntryStatus::parse(Some("Lançamento")), EntryStatus::Ongoing);
        assert_eq!(EntryStatus::parse(Some("hiatus")), EntryStatus::Unknown);
        assert_eq!(EntryStatus::parse(None), EntryStatus::Unknown);
    }
}
