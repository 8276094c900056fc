//! Listing pages and partial-success aggregates.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Entry;

/// One page of a listing feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EntriesPage {
    pub entries: Vec<Entry>,

    /// Derived from the next-page marker, never from the item count
    pub has_more: bool,

    /// Elements that failed to map and were skipped
    #[serde(default, skip_serializing)]
    pub dropped: usize,
}

impl EntriesPage {
    /// A one-item page with no continuation.
    pub fn single(entry: Entry) -> Self {
        Self {
            entries: vec![entry],
            has_more: false,
            dropped: 0,
        }
    }
}

/// Items that were produced plus the failures that were skipped on the way.
#[derive(Debug)]
pub struct Partial<T> {
    pub items: Vec<T>,
    pub failures: Vec<AppError>,
}

impl<T> Default for Partial<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Partial<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome.
    pub fn push(&mut self, result: Result<T, AppError>) {
        match result {
            Ok(item) => self.items.push(item),
            Err(error) => self.failures.push(error),
        }
    }

    /// Number of dropped units.
    pub fn dropped(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> FromIterator<Result<T, AppError>> for Partial<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, AppError>>>(iter: I) -> Self {
        let mut partial = Partial::new();
        for result in iter {
            partial.push(result);
        }
        partial
    }
}
