//! Listing feeds: popular, latest and search.

use crate::adapter::{MapEntryFn, SiteAdapterConfig};
use crate::error::Result;
use crate::fetcher::{Document, DocumentFetcher, FetchRequest};
use crate::models::{EntriesPage, Feed, FilterList, Partial};
use crate::services::TaxonomyCache;
use crate::utils::{encode_query, fill_template, parse_selector};

/// How a listing request is built and its response parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Popular,
    Latest,
    TextSearch,
    Filter,
}

/// Runs one listing request against a site.
pub struct ListingPipeline<'a> {
    adapter: &'a SiteAdapterConfig,
    fetcher: &'a dyn DocumentFetcher,
    taxonomy: &'a TaxonomyCache,
}

impl<'a> ListingPipeline<'a> {
    pub fn new(
        adapter: &'a SiteAdapterConfig,
        fetcher: &'a dyn DocumentFetcher,
        taxonomy: &'a TaxonomyCache,
    ) -> Self {
        Self {
            adapter,
            fetcher,
            taxonomy,
        }
    }

    /// Build the request for one page of `feed`.
    ///
    /// A non-empty search query wins over filters; with neither the
    /// popular request is used.
    pub fn request_for(&self, feed: &Feed, page: u32) -> Result<(ListingKind, FetchRequest)> {
        let paths = &self.adapter.site.paths;
        let page_str = page.max(1).to_string();

        let (kind, path) = match feed {
            Feed::Popular => (ListingKind::Popular, paths.popular.clone()),
            Feed::Latest => (
                ListingKind::Latest,
                fill_template(&paths.latest, &[("page", page_str.as_str())]),
            ),
            Feed::Search { query, filters } => {
                let query = encode_query(query);
                if !query.is_empty() {
                    let path = fill_template(&paths.search, &[("page", page_str.as_str()), ("query", query.as_str())]);
                    (ListingKind::TextSearch, path)
                } else if let Some(value) = filters.first_active() {
                    (ListingKind::Filter, self.filter_path(value, page))
                } else {
                    (ListingKind::Popular, paths.popular.clone())
                }
            }
        };

        Ok((kind, self.adapter.request(&path)?))
    }

    fn filter_path(&self, value: &str, page: u32) -> String {
        let paths = &self.adapter.site.paths;
        let mut path = fill_template(&paths.filter, &[("value", value)]);
        if page > 1 {
            let suffix = fill_template(&paths.filter_page_suffix, &[("page", page.to_string().as_str())]);
            path = format!("{}{}", path.trim_end_matches('/'), suffix);
        }
        path
    }

    /// Fetch and parse one page of `feed`.
    ///
    /// A failing primary fetch is returned unchanged. Entries that fail to
    /// map are dropped and counted. A successful popular or latest page
    /// also warms the taxonomy cache.
    pub async fn list(&self, feed: &Feed, page: u32) -> Result<EntriesPage> {
        let (kind, request) = self.request_for(feed, page)?;
        log::debug!("Listing {:?} page {} from {}", kind, page, request.url);

        let document = self.fetcher.fetch(&request).await?;
        let result = parse_listing(&document, kind, self.adapter)?;

        if feed.loads_taxonomy() {
            self.taxonomy.ensure_loaded(self.fetcher, self.adapter).await;
        }

        Ok(result)
    }
}

/// Parse a listing document with the selectors and mapper for `kind`.
pub fn parse_listing(document: &Document, kind: ListingKind, adapter: &SiteAdapterConfig) -> Result<EntriesPage> {
    let selectors = &adapter.site.selectors;
    let mappers = &adapter.mappers;

    let (item_selector, next_selector, mapper): (&str, Option<&str>, MapEntryFn) = match kind {
        ListingKind::Popular => (
            selectors.popular_entry.as_str(),
            selectors.popular_next_page.as_deref(),
            mappers.entry,
        ),
        ListingKind::Latest | ListingKind::Filter => (
            selectors.latest_entry.as_str(),
            Some(selectors.next_page.as_str()),
            mappers.entry,
        ),
        ListingKind::TextSearch => (
            selectors.search_entry.as_str(),
            Some(selectors.next_page.as_str()),
            mappers.search_entry,
        ),
    };

    let item_sel = parse_selector(item_selector)?;
    let next_sel = next_selector.map(parse_selector).transpose()?;
    let html = document.html();

    let partial: Partial<_> = html
        .select(&item_sel)
        .map(|element| mapper(element, adapter))
        .collect();
    for error in &partial.failures {
        log::warn!("Skipping entry on {}: {}", document.location, error);
    }

    let has_more = next_sel.is_some_and(|sel| html.select(&sel).next().is_some());
    let dropped = partial.dropped();

    Ok(EntriesPage {
        entries: partial.into_items(),
        has_more,
        dropped,
    })
}

/// Filters to attach to a search when the caller picked a taxonomy value.
pub fn filters_with_value(mut filters: FilterList, value: Option<&str>) -> FilterList {
    if let Some(value) = value {
        if !filters.select_value(value) {
            log::warn!("Filter value '{}' is not in the loaded taxonomy", value);
        }
    }
    filters
}
