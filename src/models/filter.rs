//! Taxonomy entries and the search filters built from them.

use serde::{Deserialize, Serialize};

/// One selectable taxonomy value (e.g. a genre).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyEntry {
    pub display_name: String,

    /// Site-relative path fragment; empty for the "unselected" sentinel
    pub query_value: String,
}

impl TaxonomyEntry {
    pub fn new(display_name: impl Into<String>, query_value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            query_value: query_value.into(),
        }
    }

    /// The synthetic "please select" entry placed first in a taxonomy.
    pub fn sentinel(display_name: impl Into<String>) -> Self {
        Self::new(display_name, "")
    }
}

/// A single search filter control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Filter {
    /// Informational text with no state
    Header(String),

    /// Single-choice selection; `state` indexes into `options`
    Select {
        name: String,
        options: Vec<TaxonomyEntry>,
        #[serde(default)]
        state: usize,
    },
}

impl Filter {
    /// Query value of the current selection, if this is an active select.
    pub fn active_value(&self) -> Option<&str> {
        match self {
            Filter::Select { options, state, .. } if *state != 0 => {
                options.get(*state).map(|o| o.query_value.as_str())
            }
            _ => None,
        }
    }
}

/// Ordered list of filters as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FilterList(pub Vec<Filter>);

impl FilterList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.0.iter()
    }

    /// Query value of the first active single-choice filter.
    pub fn first_active(&self) -> Option<&str> {
        self.0.iter().find_map(Filter::active_value)
    }

    /// Select the option whose query value matches `value` in every select.
    ///
    /// Returns `true` when at least one select changed.
    pub fn select_value(&mut self, value: &str) -> bool {
        let mut changed = false;
        for filter in &mut self.0 {
            if let Filter::Select { options, state, .. } = filter {
                if let Some(index) = options.iter().position(|o| o.query_value == value) {
                    *state = index;
                    changed = true;
                }
            }
        }
        changed
    }
}

impl From<Vec<Filter>> for FilterList {
    fn from(filters: Vec<Filter>) -> Self {
        Self(filters)
    }
}
