//! Entry detail fetching.

use crate::adapter::SiteAdapterConfig;
use crate::error::Result;
use crate::fetcher::{Document, DocumentFetcher};
use crate::models::Entry;
use crate::services::CanonicalResolver;

/// Fetches canonical detail documents and parses them into entries.
pub struct DetailsService<'a> {
    adapter: &'a SiteAdapterConfig,
    fetcher: &'a dyn DocumentFetcher,
}

impl<'a> DetailsService<'a> {
    pub fn new(adapter: &'a SiteAdapterConfig, fetcher: &'a dyn DocumentFetcher) -> Self {
        Self { adapter, fetcher }
    }

    /// Fetch `path` and follow it up to its canonical document.
    pub async fn fetch_canonical(&self, path: &str) -> Result<Document> {
        let request = self.adapter.request(path)?;
        let document = self.fetcher.fetch(&request).await?;
        CanonicalResolver::new(self.adapter, self.fetcher)
            .resolve(document)
            .await
    }

    /// Fetch and parse the details of the entry at `path`.
    pub async fn details(&self, path: &str) -> Result<Entry> {
        let document = self.fetch_canonical(path).await?;
        parse_details(&document, self.adapter)
    }
}

/// Run the site's details mapper over a canonical document.
pub fn parse_details(document: &Document, adapter: &SiteAdapterConfig) -> Result<Entry> {
    let html = document.html();
    (adapter.mappers.details)(&html, &document.location, adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;
    use crate::models::SiteConfig;
    use crate::themes::dooplay;

    fn adapter() -> SiteAdapterConfig {
        let mut site = SiteConfig::default();
        site.base_url = "https://site.example".to_string();
        dooplay::adapter(site, true).unwrap()
    }

    #[tokio::test]
    async fn test_details_from_episode_page_uses_canonical_location() {
        let fetcher = MockFetcher::new()
            .page(
                "https://site.example/episodes/foo-1x1/",
                r#"<div class="pag_episodes"><div class="item">
                   <a href="/tvshows/foo/"><i class="fa-bars"></i></a></div></div>"#,
            )
            .page(
                "https://site.example/tvshows/foo/",
                r#"<div class="sheader"><div class="poster"><img src="/p.jpg" alt="Foo"></div></div>"#,
            );
        let adapter = adapter();

        let entry = DetailsService::new(&adapter, &fetcher)
            .details("episodes/foo-1x1/")
            .await
            .unwrap();

        assert_eq!(entry.canonical_path, "/tvshows/foo/");
        assert_eq!(entry.title, "Foo");
        assert_eq!(fetcher.call_count(), 2);
    }

    #[tokio::test]
    async fn test_primary_failure_is_surfaced() {
        let fetcher = MockFetcher::new().failing("https://site.example/tvshows/gone/", 404);
        let adapter = adapter();

        let result = DetailsService::new(&adapter, &fetcher)
            .details("/tvshows/gone/")
            .await;

        assert!(result.is_err());
    }
}
