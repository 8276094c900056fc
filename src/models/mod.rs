// src/models/mod.rs

//! Domain models for the source adapters.
//!
//! This module contains the shared catalog schema and the configuration
//! structures, organized by their primary purpose.

mod alternative;
mod config;
mod entry;
mod episode;
mod filter;
mod page;
mod selectors;

// Re-export all public types
pub use alternative::Alternative;
pub use config::{
    CaseRule, Config, FetcherConfig, Labels, LoggingConfig, RankingConfig, RankingRule,
    SiteConfig, SitePaths,
};
pub use entry::{Entry, EntryStatus};
pub use episode::{Episode, Season};
pub use filter::{Filter, FilterList, TaxonomyEntry};
pub use page::{EntriesPage, Partial};
pub use selectors::ThemeSelectors;

/// Which listing feed a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    Popular,
    Latest,
    Search { query: String, filters: FilterList },
}

impl Feed {
    /// Free-text search with no structural filters.
    pub fn search(query: impl Into<String>) -> Self {
        Self::Search {
            query: query.into(),
            filters: FilterList::default(),
        }
    }

    /// Whether a successful response of this feed should warm the taxonomy.
    pub fn loads_taxonomy(&self) -> bool {
        matches!(self, Feed::Popular | Feed::Latest)
    }
}
