//! Episode aggregation.
//!
//! Turns a canonical detail document into the ordered episode list:
//!
//! 1. no season groups → one "Movie" episode pointing at the page itself
//! 2. each season group → its episodes mapped in document order, failures
//!    skipped, then reversed (sites list newest first)
//! 3. seasons concatenated in document order, then the whole list reversed
//!
//! The net order is `reverse(concat(reverse(S1), reverse(S2), ...))`.

use scraper::ElementRef;
use url::Url;

use crate::adapter::SiteAdapterConfig;
use crate::error::{AppError, Result};
use crate::fetcher::{Document, DocumentFetcher};
use crate::models::{Episode, Partial, Season};
use crate::services::WorkerPool;
use crate::utils::parse_selector;

/// What the canonical document says about its seasons.
enum SeasonScan {
    /// No season groups at all
    Movie,
    /// Episodes are inline, already mapped
    Inline(Vec<Season>, Vec<AppError>),
    /// Each season's episodes live on their own page
    Remote(Vec<(String, Url)>, Vec<AppError>),
}

/// Builds the episode list of an entry.
pub struct EpisodeAggregator<'a> {
    adapter: &'a SiteAdapterConfig,
    fetcher: &'a dyn DocumentFetcher,
    pool: &'a WorkerPool,
}

impl<'a> EpisodeAggregator<'a> {
    pub fn new(
        adapter: &'a SiteAdapterConfig,
        fetcher: &'a dyn DocumentFetcher,
        pool: &'a WorkerPool,
    ) -> Self {
        Self {
            adapter,
            fetcher,
            pool,
        }
    }

    /// Aggregate the episodes of a canonical document.
    ///
    /// Dropped episodes and dropped seasons are reported in the returned
    /// [`Partial`]; only configuration errors (bad selectors) fail the call.
    pub async fn aggregate(&self, canonical: &Document) -> Result<Partial<Episode>> {
        let (seasons, failures) = match scan_seasons(canonical, self.adapter)? {
            SeasonScan::Movie => {
                return Ok(Partial {
                    items: vec![movie_episode(canonical, self.adapter)],
                    failures: Vec::new(),
                });
            }
            SeasonScan::Inline(seasons, failures) => (seasons, failures),
            SeasonScan::Remote(links, mut failures) => {
                let (seasons, fetch_failures) = self.fetch_seasons(links).await;
                failures.extend(fetch_failures);
                (seasons, failures)
            }
        };

        Ok(flatten_seasons(seasons, failures))
    }

    /// Fetch season pages through the shared pool, dropping failed seasons.
    async fn fetch_seasons(&self, links: Vec<(String, Url)>) -> (Vec<Season>, Vec<AppError>) {
        let adapter = self.adapter;
        let fetcher = self.fetcher;

        let results = self
            .pool
            .map_ordered(links, |(name, url)| async move {
                let request = adapter.request_url(url);
                let document = fetcher.fetch(&request).await?;
                map_season_page(&document, &name, adapter)
            })
            .await;

        let mut seasons = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok((season, dropped)) => {
                    seasons.push(season);
                    failures.extend(dropped);
                }
                Err(error) => {
                    log::warn!("Dropping season: {}", error);
                    failures.push(error);
                }
            }
        }
        (seasons, failures)
    }
}

/// The single-feature fallback; never fails.
fn movie_episode(canonical: &Document, adapter: &SiteAdapterConfig) -> Episode {
    Episode::new(
        1.0,
        adapter.labels.movie.clone(),
        adapter.relative_path(canonical.location.as_str()),
    )
}

fn scan_seasons(canonical: &Document, adapter: &SiteAdapterConfig) -> Result<SeasonScan> {
    let selectors = &adapter.site.selectors;
    let group_sel = parse_selector(&selectors.season_group)?;
    let html = canonical.html();
    let groups: Vec<ElementRef<'_>> = html.select(&group_sel).collect();

    if groups.is_empty() {
        return Ok(SeasonScan::Movie);
    }

    let mut failures = Vec::new();

    if let Some(link_selector) = &selectors.season_link {
        let link_sel = parse_selector(link_selector)?;
        let mut links = Vec::new();
        for group in groups {
            let link = season_header(group, adapter).and_then(|name| {
                let href = group
                    .select(&link_sel)
                    .next()
                    .and_then(|a| a.value().attr(&selectors.attr_name))
                    .ok_or_else(|| AppError::missing(link_selector, "season group"))?;
                Ok((name, canonical.location.join(href)?))
            });
            match link {
                Ok(link) => links.push(link),
                Err(error) => {
                    log::warn!("Dropping season in {}: {}", canonical.location, error);
                    failures.push(error);
                }
            }
        }
        return Ok(SeasonScan::Remote(links, failures));
    }

    let mut seasons = Vec::new();
    for group in groups {
        match season_header(group, adapter) {
            Ok(name) => {
                let (season, dropped) = map_season(group, &name, adapter)?;
                failures.extend(dropped);
                seasons.push(season);
            }
            Err(error) => {
                log::warn!("Dropping season in {}: {}", canonical.location, error);
                failures.push(error);
            }
        }
    }
    Ok(SeasonScan::Inline(seasons, failures))
}

fn season_header(group: ElementRef<'_>, adapter: &SiteAdapterConfig) -> Result<String> {
    (adapter.mappers.season_name)(group, adapter)
}

/// Map every episode element of one season, skipping failures.
///
/// The returned season is in ascending order (the raw list reversed).
fn map_season(
    scope: ElementRef<'_>,
    name: &str,
    adapter: &SiteAdapterConfig,
) -> Result<(Season, Vec<AppError>)> {
    let item_sel = parse_selector(&adapter.site.selectors.episode_item)?;

    let mut partial: Partial<Episode> = scope
        .select(&item_sel)
        .map(|element| (adapter.mappers.episode)(element, name, adapter))
        .collect();

    for error in &partial.failures {
        log::warn!("Skipping episode in season '{}': {}", name, error);
    }
    partial.items.reverse();

    Ok((
        Season {
            display_name: name.to_string(),
            episodes: partial.items,
        },
        partial.failures,
    ))
}

fn map_season_page(
    document: &Document,
    name: &str,
    adapter: &SiteAdapterConfig,
) -> Result<(Season, Vec<AppError>)> {
    let html = document.html();
    map_season(html.root_element(), name, adapter)
}

/// Concatenate seasons in document order, then reverse the whole list.
fn flatten_seasons(seasons: Vec<Season>, failures: Vec<AppError>) -> Partial<Episode> {
    let mut items: Vec<Episode> = seasons.into_iter().flat_map(|s| s.episodes).collect();
    items.reverse();
    Partial { items, failures }
}
