// src/adapter.rs

//! Per-site strategy value.
//!
//! A concrete site is pure data ([`SiteConfig`]) plus a handful of small
//! element mappers ([`SiteMappers`]). The generic services receive a
//! [`SiteAdapterConfig`] and call back into the mappers; they never
//! hardcode a selector themselves.

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::Result;
use crate::fetcher::{Document, FetchRequest};
use crate::models::{
    Alternative, CaseRule, Entry, Episode, Labels, SiteConfig, TaxonomyEntry,
};
use crate::services::ranker::contains_preference;
use crate::utils::path_without_domain;

/// Map one listing element to an entry.
pub type MapEntryFn = fn(ElementRef<'_>, &SiteAdapterConfig) -> Result<Entry>;

/// Parse a canonical details document located at the given URL.
pub type ParseDetailsFn = fn(&Html, &Url, &SiteAdapterConfig) -> Result<Entry>;

/// Extract the display name of a season group.
pub type SeasonNameFn = fn(ElementRef<'_>, &SiteAdapterConfig) -> Result<String>;

/// Map one episode element, given its season's display name.
pub type MapEpisodeFn = fn(ElementRef<'_>, &str, &SiteAdapterConfig) -> Result<Episode>;

/// Map one alternative (player option) element.
pub type MapAlternativeFn = fn(ElementRef<'_>, &SiteAdapterConfig) -> Result<Alternative>;

/// Turn a placeholder into a playable alternative using its fetched document.
pub type ResolveAlternativeFn = fn(&Document, Alternative, &SiteAdapterConfig) -> Result<Alternative>;

/// Extract `(display name, query value)` pairs from the taxonomy page.
pub type ParseTaxonomyFn = fn(&Html, &SiteAdapterConfig) -> Result<Vec<TaxonomyEntry>>;

/// Does `label` satisfy the preference `value`?
pub type LabelPredicate = fn(&str, &str, CaseRule) -> bool;

/// Element mappers supplied by a concrete site.
#[derive(Clone, Copy)]
pub struct SiteMappers {
    pub entry: MapEntryFn,
    pub search_entry: MapEntryFn,
    pub details: ParseDetailsFn,
    pub season_name: SeasonNameFn,
    pub episode: MapEpisodeFn,
    pub alternative: MapAlternativeFn,
    pub resolve_alternative: Option<ResolveAlternativeFn>,
    pub taxonomy: ParseTaxonomyFn,
}

/// Everything the generic pipeline needs to know about one site.
#[derive(Clone)]
pub struct SiteAdapterConfig {
    pub site: SiteConfig,
    pub base: Url,
    pub labels: Labels,
    /// Headers sent with every request
    pub headers: Vec<(String, String)>,
    pub mappers: SiteMappers,
    pub label_predicate: LabelPredicate,
}

impl SiteAdapterConfig {
    /// Create an adapter; labels follow `site.lang`.
    pub fn new(site: SiteConfig, mappers: SiteMappers, send_referer: bool) -> Result<Self> {
        let base = site.base()?;
        let labels = Labels::for_lang(&site.lang);
        let mut headers = Vec::new();
        if send_referer {
            headers.push(("Referer".to_string(), site.base_url.clone()));
        }

        Ok(Self {
            site,
            base,
            labels,
            headers,
            mappers,
            label_predicate: contains_preference,
        })
    }

    /// Replace the label predicate used by the ranker.
    pub fn with_label_predicate(mut self, predicate: LabelPredicate) -> Self {
        self.label_predicate = predicate;
        self
    }

    /// Request for a site-relative path.
    pub fn request(&self, path: &str) -> Result<FetchRequest> {
        Ok(self.request_url(self.site.url_for(path)?))
    }

    /// Request for an absolute or site-relative href.
    pub fn request_href(&self, href: &str) -> Result<FetchRequest> {
        Ok(self.request_url(self.base.join(href)?))
    }

    /// Request for an absolute URL with the site's default headers.
    pub fn request_url(&self, url: Url) -> FetchRequest {
        FetchRequest::new(url).with_headers(&self.headers)
    }

    /// Site-relative form of an href.
    pub fn relative_path(&self, href: &str) -> String {
        path_without_domain(&self.base, href)
    }
}
