//! Canonical-document resolution.
//!
//! Themed sites often serve an episode page that links back to its parent
//! series page through a navigation marker. Detail parsing and episode
//! aggregation both need the parent (canonical) page.

use url::Url;

use crate::adapter::SiteAdapterConfig;
use crate::error::{AppError, Result};
use crate::fetcher::{Document, DocumentFetcher};
use crate::utils::parse_selector;

/// Swaps a subordinate document for its canonical parent.
pub struct CanonicalResolver<'a> {
    adapter: &'a SiteAdapterConfig,
    fetcher: &'a dyn DocumentFetcher,
}

impl<'a> CanonicalResolver<'a> {
    pub fn new(adapter: &'a SiteAdapterConfig, fetcher: &'a dyn DocumentFetcher) -> Self {
        Self { adapter, fetcher }
    }

    /// Return the canonical document for `document`.
    ///
    /// Without a navigation marker the input is already canonical and is
    /// returned as is. Otherwise exactly one fetch is issued for the parent
    /// link; its failure propagates with no retry and no fallback.
    pub async fn resolve(&self, document: Document) -> Result<Document> {
        match parent_link(&document, self.adapter)? {
            None => Ok(document),
            Some(parent) => {
                log::debug!(
                    "{} is a subordinate page, fetching canonical {}",
                    document.location,
                    parent
                );
                let request = self.adapter.request_url(parent);
                self.fetcher.fetch(&request).await
            }
        }
    }
}

/// Parent URL advertised by the navigation marker, if the document has one.
pub fn parent_link(document: &Document, adapter: &SiteAdapterConfig) -> Result<Option<Url>> {
    let selectors = &adapter.site.selectors;
    let marker_sel = parse_selector(&selectors.canonical_marker)?;
    let html = document.html();

    let Some(marker) = html.select(&marker_sel).next() else {
        return Ok(None);
    };

    let attr = selectors.attr_name.as_str();
    let href = std::iter::once(marker)
        .chain(marker.ancestors().filter_map(scraper::ElementRef::wrap))
        .find(|el| el.value().name() == "a" && el.value().attr(attr).is_some())
        .and_then(|link| link.value().attr(attr))
        .ok_or_else(|| {
            AppError::missing(
                format!("a[{attr}] around {}", selectors.canonical_marker),
                document.location.as_str(),
            )
        })?;

    Ok(Some(document.location.join(href)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;
    use crate::models::SiteConfig;
    use crate::themes::dooplay;

    const EPISODE_PAGE: &str = r#"<html><body>
        <div class="pag_episodes">
          <div class="item"><a href="https://site.example/episodes/foo-1x1/"><i class="fa-arrow-left"></i></a></div>
          <div class="item"><a href="https://site.example/tvshows/foo/"><i class="fa-bars"></i> All</a></div>
        </div></body></html>"#;

    const SERIES_PAGE: &str = r#"<html><body><div class="sheader"><h1>Foo</h1></div></body></html>"#;

    fn adapter() -> SiteAdapterConfig {
        let mut site = SiteConfig::default();
        site.base_url = "https://site.example".to_string();
        dooplay::adapter(site, true).unwrap()
    }

    fn doc(url: &str, body: &str) -> Document {
        Document::new(Url::parse(url).unwrap(), body)
    }

    #[tokio::test]
    async fn test_canonical_document_is_returned_unchanged() {
        let fetcher = MockFetcher::new();
        let adapter = adapter();
        let input = doc("https://site.example/tvshows/foo/", SERIES_PAGE);

        let out = CanonicalResolver::new(&adapter, &fetcher)
            .resolve(input.clone())
            .await
            .unwrap();

        assert_eq!(out, input);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_marker_triggers_exactly_one_fetch() {
        let fetcher = MockFetcher::new().page("https://site.example/tvshows/foo/", SERIES_PAGE);
        let adapter = adapter();

        let out = CanonicalResolver::new(&adapter, &fetcher)
            .resolve(doc("https://site.example/episodes/foo-1x2/", EPISODE_PAGE))
            .await
            .unwrap();

        assert_eq!(out.location.as_str(), "https://site.example/tvshows/foo/");
        assert_eq!(fetcher.call_count(), 1);
        let request = fetcher.last_request().unwrap();
        assert_eq!(request.headers[0].0, "Referer");
    }

    #[tokio::test]
    async fn test_secondary_fetch_failure_propagates() {
        let fetcher = MockFetcher::new().failing("https://site.example/tvshows/foo/", 503);
        let adapter = adapter();

        let result = CanonicalResolver::new(&adapter, &fetcher)
            .resolve(doc("https://site.example/episodes/foo-1x2/", EPISODE_PAGE))
            .await;

        assert!(matches!(result, Err(AppError::Status { status: 503, .. })));
        assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn test_parent_link_resolves_relative_href() {
        let body = r#"<div class="pag_episodes"><div class="item">
            <a href="/tvshows/bar/"><i class="fa-bars"></i></a></div></div>"#;
        let link = parent_link(&doc("https://site.example/episodes/bar-1x1/", body), &adapter())
            .unwrap()
            .unwrap();
        assert_eq!(link.as_str(), "https://site.example/tvshows/bar/");
    }
}
