//! Lazily fetched taxonomy (genre list) backing the search filters.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::adapter::SiteAdapterConfig;
use crate::error::Result;
use crate::fetcher::{Document, DocumentFetcher};
use crate::models::{Filter, FilterList, Labels, TaxonomyEntry};

#[derive(Debug, Clone)]
enum State {
    NotLoaded,
    Loading,
    Loaded(Arc<[TaxonomyEntry]>),
    Failed,
}

/// Observable state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyStatus {
    NotLoaded,
    Loading,
    Loaded,
    /// Last attempt failed or found nothing; the next listing retries
    Failed,
}

/// Best-effort taxonomy cache.
///
/// Failures never reach the caller: the state moves to `Failed` and the
/// next successful listing tries again. Once loaded no further fetch is
/// issued for the lifetime of the cache.
#[derive(Debug)]
pub struct TaxonomyCache {
    state: Mutex<State>,
    enabled: bool,
}

impl TaxonomyCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            state: Mutex::new(State::NotLoaded),
            enabled,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> TaxonomyStatus {
        match *self.lock() {
            State::NotLoaded => TaxonomyStatus::NotLoaded,
            State::Loading => TaxonomyStatus::Loading,
            State::Loaded(_) => TaxonomyStatus::Loaded,
            State::Failed => TaxonomyStatus::Failed,
        }
    }

    /// Fetch the taxonomy unless it is loaded or being loaded.
    ///
    /// Returns whether the taxonomy is loaded after the call.
    pub async fn ensure_loaded(&self, fetcher: &dyn DocumentFetcher, adapter: &SiteAdapterConfig) -> bool {
        if !self.enabled {
            return false;
        }

        {
            let mut state = self.lock();
            match *state {
                State::Loaded(_) => return true,
                State::Loading => return false,
                State::NotLoaded | State::Failed => *state = State::Loading,
            }
        }
        let guard = LoadGuard { cache: self, armed: true };

        let outcome = match load(fetcher, adapter).await {
            Ok(entries) if !entries.is_empty() => {
                log::info!("Loaded {} taxonomy entries for {}", entries.len(), adapter.site.name);
                let mut all = Vec::with_capacity(entries.len() + 1);
                all.push(TaxonomyEntry::sentinel(&adapter.labels.select_filter));
                all.extend(entries);
                State::Loaded(all.into())
            }
            Ok(_) => {
                log::warn!("Taxonomy page of {} listed no entries", adapter.site.name);
                State::Failed
            }
            Err(error) => {
                log::warn!("Failed to load taxonomy for {}: {}", adapter.site.name, error);
                State::Failed
            }
        };

        let loaded = matches!(outcome, State::Loaded(_));
        guard.finish(outcome);
        loaded
    }

    /// Loaded entries, sentinel first; empty when not loaded.
    pub fn current_taxonomy(&self) -> Vec<TaxonomyEntry> {
        match &*self.lock() {
            State::Loaded(entries) => entries.to_vec(),
            _ => Vec::new(),
        }
    }

    /// Filter controls for the current state.
    pub fn filter_list(&self, labels: &Labels) -> FilterList {
        if !self.enabled {
            return FilterList::default();
        }

        let entries = self.current_taxonomy();
        if entries.is_empty() {
            return vec![Filter::Header(labels.taxonomy_missing.clone())].into();
        }

        vec![
            Filter::Header(labels.filter_header.clone()),
            Filter::Select {
                name: labels.taxonomy_title.clone(),
                options: entries,
                state: 0,
            },
        ]
        .into()
    }
}

/// Owns the `Loading` state of one `ensure_loaded` call.
///
/// If the call is dropped before it finishes, the state goes back to
/// `NotLoaded` so a later listing retries instead of waiting forever.
struct LoadGuard<'a> {
    cache: &'a TaxonomyCache,
    armed: bool,
}

impl LoadGuard<'_> {
    fn finish(mut self, outcome: State) {
        *self.cache.lock() = outcome;
        self.armed = false;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.cache.lock();
        if matches!(*state, State::Loading) {
            log::debug!("Taxonomy load abandoned, resetting");
            *state = State::NotLoaded;
        }
    }
}

async fn load(fetcher: &dyn DocumentFetcher, adapter: &SiteAdapterConfig) -> Result<Vec<TaxonomyEntry>> {
    let request = adapter.request(&adapter.site.paths.taxonomy)?;
    let document = fetcher.fetch(&request).await?;
    parse(&document, adapter)
}

fn parse(document: &Document, adapter: &SiteAdapterConfig) -> Result<Vec<TaxonomyEntry>> {
    let html = document.html();
    (adapter.mappers.taxonomy)(&html, adapter)
}
