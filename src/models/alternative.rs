//! Playable alternative (video, page or server candidate).

use serde::{Deserialize, Serialize};

/// One candidate playable resource for an episode.
///
/// `label` is free text: quality, server and language are embedded as
/// substrings and matched by containment, never by equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alternative {
    pub resource_url: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_headers: Vec<(String, String)>,

    /// The URL still points at a placeholder that needs one more fetch
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unresolved: bool,
}

impl Alternative {
    /// Create an already playable alternative.
    pub fn new(resource_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            resource_url: resource_url.into(),
            label: label.into(),
            extra_headers: Vec::new(),
            unresolved: false,
        }
    }

    /// Create a placeholder whose playable URL is resolved later.
    pub fn placeholder(resource_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            unresolved: true,
            ..Self::new(resource_url, label)
        }
    }
}
