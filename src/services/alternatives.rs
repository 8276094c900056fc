//! Playable alternatives of an episode.

use crate::adapter::{ResolveAlternativeFn, SiteAdapterConfig};
use crate::error::{AppError, Result};
use crate::fetcher::{Document, DocumentFetcher};
use crate::models::{Alternative, Partial};
use crate::services::WorkerPool;
use crate::utils::parse_selector;

/// Collects and resolves the alternatives listed on an episode page.
pub struct AlternativeCollector<'a> {
    adapter: &'a SiteAdapterConfig,
    fetcher: &'a dyn DocumentFetcher,
    pool: &'a WorkerPool,
}

impl<'a> AlternativeCollector<'a> {
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

    /// Fetch the episode page and return its alternatives in page order.
    ///
    /// The episode fetch failing fails the call. A candidate that cannot be
    /// mapped or resolved is dropped without affecting the others.
    pub async fn collect(&self, episode_path: &str) -> Result<Partial<Alternative>> {
        let request = self.adapter.request(episode_path)?;
        let document = self.fetcher.fetch(&request).await?;
        let mut candidates = map_candidates(&document, self.adapter)?;

        let Some(resolve) = self.adapter.mappers.resolve_alternative else {
            return Ok(only_resolved(candidates));
        };

        let mut out = Partial {
            items: Vec::new(),
            failures: std::mem::take(&mut candidates.failures),
        };
        let resolved = self
            .pool
            .map_ordered(candidates.items, |candidate| self.resolve_one(candidate, resolve))
            .await;
        for result in resolved {
            if let Err(error) = &result {
                log::warn!("Dropping alternative of {}: {}", episode_path, error);
            }
            out.push(result);
        }
        Ok(out)
    }

    async fn resolve_one(&self, candidate: Alternative, resolve: ResolveAlternativeFn) -> Result<Alternative> {
        if !candidate.unresolved {
            return Ok(candidate);
        }
        let request = self.adapter.request_href(&candidate.resource_url)?;
        let document = self.fetcher.fetch(&request).await?;
        resolve(&document, candidate, self.adapter)
    }
}

fn map_candidates(document: &Document, adapter: &SiteAdapterConfig) -> Result<Partial<Alternative>> {
    let item_sel = parse_selector(&adapter.site.selectors.alternative_item)?;
    let html = document.html();

    let partial: Partial<Alternative> = html
        .select(&item_sel)
        .map(|element| (adapter.mappers.alternative)(element, adapter))
        .collect();
    for error in &partial.failures {
        log::warn!("Skipping alternative on {}: {}", document.location, error);
    }
    Ok(partial)
}

/// Placeholders left unresolved count as failures for the caller.
pub fn only_resolved(partial: Partial<Alternative>) -> Partial<Alternative> {
    let mut out = Partial {
        items: Vec::new(),
        failures: partial.failures,
    };
    for alternative in partial.items {
        if alternative.unresolved {
            out.failures.push(AppError::mapping(
                &alternative.resource_url,
                "alternative was not resolved",
            ));
        } else {
            out.items.push(alternative);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;
    use crate::models::SiteConfig;
    use crate::themes::dooplay;

    const EPISODE: &str = r#"<ul id="playeroptionsul">
        <li data-post="7" data-type="tv" data-nume="1"><span class="title">Alpha 720p</span></li>
        <li data-post="7" data-type="tv" data-nume="2"><span class="title">Beta 1080p</span></li>
        <li data-post="7" data-type="tv"><span class="title">Broken</span></li>
        <li data-post="7" data-type="tv" data-nume="3"><span class="title">Gamma 480p</span></li>
      </ul>"#;

    fn player(n: u32) -> String {
        format!("https://site.example/wp-json/dooplayer/v1/post/7?type=tv&source={n}")
    }

    fn adapter() -> SiteAdapterConfig {
        let mut site = SiteConfig::default();
        site.base_url = "https://site.example".to_string();
        dooplay::adapter(site, true).unwrap()
    }

    #[tokio::test]
    async fn test_one_failed_candidate_does_not_cancel_others() {
        let fetcher = MockFetcher::new()
            .page("https://site.example/episodes/foo-1x1/", EPISODE)
            .page(&player(1), r#"{"embed_url":"https://a.example/e/1"}"#)
            .failing(&player(2), 500)
            .page(&player(3), r#"{"embed_url":"https://c.example/e/3"}"#);
        let adapter = adapter();
        let pool = WorkerPool::new(2);

        let out = AlternativeCollector::new(&adapter, &fetcher, &pool)
            .collect("/episodes/foo-1x1/")
            .await
            .unwrap();

        let urls: Vec<&str> = out.items.iter().map(|a| a.resource_url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example/e/1", "https://c.example/e/3"]);
        // one unmappable element plus one failed resolution
        assert_eq!(out.dropped(), 2);
        assert_eq!(fetcher.call_count(), 4);
    }

    #[tokio::test]
    async fn test_episode_fetch_failure_is_an_error() {
        let fetcher = MockFetcher::new();
        let adapter = adapter();
        let pool = WorkerPool::new(2);

        let result = AlternativeCollector::new(&adapter, &fetcher, &pool)
            .collect("/episodes/missing/")
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_only_resolved() {
        let partial = Partial {
            items: vec![
                Alternative::new("https://a.example/1", "A"),
                Alternative::placeholder("https://site.example/p", "B"),
            ],
            failures: Vec::new(),
        };
        let out = only_resolved(partial);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.dropped(), 1);
    }
}
