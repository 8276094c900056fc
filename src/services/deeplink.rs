//! Direct `path:` lookups used by URL-open flows.

use crate::adapter::SiteAdapterConfig;
use crate::error::Result;
use crate::fetcher::DocumentFetcher;
use crate::models::EntriesPage;
use crate::services::DetailsService;

/// Search prefix marking the rest of the query as a site-relative path.
pub const PREFIX_SEARCH: &str = "path:";

/// Site-relative path carried by a deep-link query, if it is one.
pub fn deep_link_path(query: &str) -> Option<&str> {
    query
        .trim()
        .strip_prefix(PREFIX_SEARCH)
        .filter(|path| !path.is_empty())
}

/// Resolves a deep-link path straight to its entry.
pub struct DeepLinkResolver<'a> {
    details: DetailsService<'a>,
}

impl<'a> DeepLinkResolver<'a> {
    pub fn new(adapter: &'a SiteAdapterConfig, fetcher: &'a dyn DocumentFetcher) -> Self {
        Self {
            details: DetailsService::new(adapter, fetcher),
        }
    }

    /// Fetch `path`, parse its canonical details and wrap them in a
    /// one-item page with no continuation.
    pub async fn resolve(&self, path: &str) -> Result<EntriesPage> {
        log::debug!("Resolving deep link {}", path);
        let mut entry = self.details.details(path).await?;
        entry.initialized = true;
        Ok(EntriesPage::single(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;
    use crate::models::SiteConfig;
    use crate::themes::dooplay;

    #[test]
    fn test_deep_link_path() {
        assert_eq!(deep_link_path("path:foo/bar"), Some("foo/bar"));
        assert_eq!(deep_link_path("foo/bar"), None);
        assert_eq!(deep_link_path("path:"), None);
    }

    #[tokio::test]
    async fn test_resolve_fetches_path_and_returns_single_item() {
        let mut site = SiteConfig::default();
        site.base_url = "https://site.example".to_string();
        let adapter = dooplay::adapter(site, true).unwrap();
        let fetcher = MockFetcher::new().page(
            "https://site.example/foo/bar",
            r#"<div class="sheader"><div class="data"><h1>Bar</h1></div></div>"#,
        );

        let path = deep_link_path("path:foo/bar").unwrap();
        let page = DeepLinkResolver::new(&adapter, &fetcher)
            .resolve(path)
            .await
            .unwrap();

        let request = fetcher.last_request().unwrap();
        assert_eq!(request.url.path(), "/foo/bar");
        assert_eq!(page.entries.len(), 1);
        assert!(!page.has_more);
        assert!(page.entries[0].initialized);
        assert_eq!(page.entries[0].title, "Bar");
    }
}
