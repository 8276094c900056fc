// src/pipeline/source.rs

//! One configured site, with every operation a catalog client needs.

use std::sync::Arc;

use crate::adapter::SiteAdapterConfig;
use crate::error::Result;
use crate::fetcher::{DocumentFetcher, HttpFetcher};
use crate::models::{
    Alternative, Config, EntriesPage, Entry, Episode, Feed, FilterList, Partial, RankingRule,
    TaxonomyEntry,
};
use crate::services::{
    AlternativeCollector, DeepLinkResolver, DetailsService, EpisodeAggregator, ListingPipeline,
    MemoryPreferences, PreferenceStore, TaxonomyCache, TaxonomyStatus, WorkerPool,
    deep_link_path, parse_details, rank, resolve_rules,
};
use crate::themes::dooplay;

/// A site adapter bound to a fetcher, a taxonomy cache and a worker pool.
///
/// The taxonomy cache and the worker pool live as long as the source, so
/// concurrent calls share both.
pub struct Source<F: DocumentFetcher> {
    adapter: SiteAdapterConfig,
    fetcher: F,
    taxonomy: TaxonomyCache,
    pool: WorkerPool,
    ranking: Vec<RankingRule>,
    preferences: Arc<dyn PreferenceStore>,
}

impl Source<HttpFetcher> {
    /// Build a DooPlay source over HTTP from a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let adapter = dooplay::adapter(config.site.clone(), config.fetcher.send_referer)?;
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        let preferences = Arc::new(MemoryPreferences::new(config.preferences.clone()));

        Ok(Self::new(adapter, fetcher, config.fetcher.max_concurrent)
            .with_ranking(config.ranking.rules.clone())
            .with_preferences(preferences))
    }
}

impl<F: DocumentFetcher> Source<F> {
    pub fn new(adapter: SiteAdapterConfig, fetcher: F, max_concurrent: usize) -> Self {
        let taxonomy = TaxonomyCache::new(adapter.site.fetch_taxonomy);
        Self {
            adapter,
            fetcher,
            taxonomy,
            pool: WorkerPool::new(max_concurrent),
            ranking: Vec::new(),
            preferences: Arc::new(MemoryPreferences::default()),
        }
    }

    pub fn with_ranking(mut self, rules: Vec<RankingRule>) -> Self {
        self.ranking = rules;
        self
    }

    pub fn with_preferences(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn adapter(&self) -> &SiteAdapterConfig {
        &self.adapter
    }

    pub fn name(&self) -> &str {
        &self.adapter.site.name
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    fn listing(&self) -> ListingPipeline<'_> {
        ListingPipeline::new(&self.adapter, &self.fetcher, &self.taxonomy)
    }

    pub async fn popular(&self, page: u32) -> Result<EntriesPage> {
        self.listing().list(&Feed::Popular, page).await
    }

    pub async fn latest(&self, page: u32) -> Result<EntriesPage> {
        self.listing().list(&Feed::Latest, page).await
    }

    /// Search by text or filters. A `path:` query resolves directly to
    /// the entry at that path.
    pub async fn search(&self, query: &str, filters: FilterList, page: u32) -> Result<EntriesPage> {
        if let Some(path) = deep_link_path(query) {
            return DeepLinkResolver::new(&self.adapter, &self.fetcher)
                .resolve(path)
                .await;
        }

        let feed = Feed::Search {
            query: query.to_string(),
            filters,
        };
        self.listing().list(&feed, page).await
    }

    /// Details of the entry at `path`, read from its canonical page.
    pub async fn details(&self, path: &str) -> Result<Entry> {
        let mut entry = DetailsService::new(&self.adapter, &self.fetcher)
            .details(path)
            .await?;
        entry.initialized = true;
        Ok(entry)
    }

    /// Episodes of the entry at `path`, newest season first.
    pub async fn episodes(&self, path: &str) -> Result<Partial<Episode>> {
        let canonical = DetailsService::new(&self.adapter, &self.fetcher)
            .fetch_canonical(path)
            .await?;
        EpisodeAggregator::new(&self.adapter, &self.fetcher, &self.pool)
            .aggregate(&canonical)
            .await
    }

    /// Details and episodes from a single canonical fetch.
    pub async fn details_with_episodes(&self, path: &str) -> Result<(Entry, Partial<Episode>)> {
        let canonical = DetailsService::new(&self.adapter, &self.fetcher)
            .fetch_canonical(path)
            .await?;
        let mut entry = parse_details(&canonical, &self.adapter)?;
        entry.initialized = true;
        let episodes = EpisodeAggregator::new(&self.adapter, &self.fetcher, &self.pool)
            .aggregate(&canonical)
            .await?;
        Ok((entry, episodes))
    }

    /// Alternatives of the episode at `path`, ranked by the current
    /// preference values.
    pub async fn alternatives(&self, path: &str) -> Result<Partial<Alternative>> {
        let mut collected = AlternativeCollector::new(&self.adapter, &self.fetcher, &self.pool)
            .collect(path)
            .await?;

        let rules = resolve_rules(&self.ranking, self.preferences.as_ref());
        collected.items = rank(collected.items, &rules, self.adapter.label_predicate);
        Ok(collected)
    }

    /// Search filters for the current taxonomy state.
    pub fn filter_list(&self) -> FilterList {
        self.taxonomy.filter_list(&self.adapter.labels)
    }

    pub fn taxonomy(&self) -> Vec<TaxonomyEntry> {
        self.taxonomy.current_taxonomy()
    }

    pub fn taxonomy_status(&self) -> TaxonomyStatus {
        self.taxonomy.status()
    }

    /// Load the taxonomy now instead of waiting for a listing.
    pub async fn load_taxonomy(&self) -> bool {
        self.taxonomy.ensure_loaded(&self.fetcher, &self.adapter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;
    use crate::models::{CaseRule, SiteConfig};

    const HOME: &str = r##"<html><body>
        <article class="w_item_a"><a href="https://site.example/tvshows/foo/"><img src="/f.jpg" alt="Foo"></a></article>
        <ul><li class="menu-item-has-children"><a href="#">Genre</a>
          <ul class="sub-menu"><li><a href="https://site.example/genre/action/">Action</a></li></ul></li></ul>
        </body></html>"##;

    const SERIES: &str = r#"<html><body>
        <div class="sheader"><div class="data"><h1>Foo</h1></div></div>
        <div id="seasons"><div><span class="se-t">1</span><ul class="episodios">
          <li><div class="numerando">1 - 2</div><a href="https://site.example/episodes/foo-1x2/">Two</a></li>
          <li><div class="numerando">1 - 1</div><a href="https://site.example/episodes/foo-1x1/">One</a></li>
        </ul></div></div></body></html>"#;

    const EPISODE: &str = r#"<html><body>
        <div class="pag_episodes"><div class="item"><a href="https://site.example/tvshows/foo/"><i class="fa-bars"></i></a></div></div>
        <ul id="playeroptionsul">
          <li data-post="9" data-type="tv" data-nume="1"><span class="title">Server A 480p</span></li>
          <li data-post="9" data-type="tv" data-nume="2"><span class="title">Server B 720p</span></li>
        </ul></body></html>"#;

    fn source() -> Source<MockFetcher> {
        let mut site = SiteConfig::default();
        site.base_url = "https://site.example".to_string();
        let adapter = dooplay::adapter(site, true).unwrap();

        let fetcher = MockFetcher::new()
            .page("https://site.example/", HOME)
            .page("https://site.example/tvshows/foo/", SERIES)
            .page("https://site.example/episodes/foo-1x1/", EPISODE)
            .page(
                "https://site.example/wp-json/dooplayer/v1/post/9?type=tv&source=1",
                r#"{"embed_url":"https://a.example/480"}"#,
            )
            .page(
                "https://site.example/wp-json/dooplayer/v1/post/9?type=tv&source=2",
                r#"{"embed_url":"https://b.example/720"}"#,
            );

        Source::new(adapter, fetcher, 3).with_ranking(vec![RankingRule {
            key: "preferred_quality".into(),
            default: "720p".into(),
            case: CaseRule::Insensitive,
        }])
    }

    #[tokio::test]
    async fn test_popular_then_filters() {
        let source = source();
        assert_eq!(source.filter_list().len(), 1);

        let page = source.popular(1).await.unwrap();
        assert_eq!(page.entries[0].title, "Foo");

        let filters = source.filter_list();
        assert_eq!(filters.len(), 2);
        assert_eq!(source.taxonomy_status(), TaxonomyStatus::Loaded);
    }

    #[tokio::test]
    async fn test_search_with_path_prefix_is_a_deep_link() {
        let source = source();
        let page = source
            .search("path:tvshows/foo/", FilterList::default(), 1)
            .await
            .unwrap();

        assert_eq!(page.entries.len(), 1);
        assert!(page.entries[0].initialized);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_episodes_from_episode_page_use_canonical() {
        let source = source();
        let episodes = source.episodes("/episodes/foo-1x1/").await.unwrap();

        let numbers: Vec<f32> = episodes.items.iter().map(|e| e.episode_number).collect();
        assert_eq!(numbers, vec![2.0, 1.0]);
    }

    #[tokio::test]
    async fn test_details_with_episodes_share_one_canonical_fetch() {
        let source = source();
        let (entry, episodes) = source.details_with_episodes("/tvshows/foo/").await.unwrap();

        assert_eq!(entry.title, "Foo");
        assert_eq!(episodes.items.len(), 2);
        assert_eq!(source.fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_alternatives_follow_preferences() {
        let source = source();

        let ranked = source.alternatives("/episodes/foo-1x1/").await.unwrap();
        let labels: Vec<&str> = ranked.items.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Server B 720p", "Server A 480p"]);

        let preferences = Arc::new(MemoryPreferences::default());
        preferences.set("preferred_quality", "480p");
        let source = source.with_preferences(preferences);

        let ranked = source.alternatives("/episodes/foo-1x1/").await.unwrap();
        assert_eq!(ranked.items[0].resource_url, "https://a.example/480");
    }
}
