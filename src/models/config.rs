//! Application configuration structures.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ThemeSelectors;
use crate::utils::parse_selector;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// The themed site being adapted
    #[serde(default)]
    pub site: SiteConfig,

    /// Preference rules used to order alternatives
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Initial preference values, keyed by rule key
    #[serde(default)]
    pub preferences: HashMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_concurrent == 0 {
            return Err(AppError::validation("fetcher.max_concurrent must be > 0"));
        }
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::validation("site.base_url is empty"));
        }
        self.site.base()?;
        for (field, selector) in self.site.selectors.all() {
            parse_selector(selector).map_err(|e| {
                AppError::validation(format!("site.selectors.{field} is invalid: {e}"))
            })?;
        }
        for rule in &self.ranking.rules {
            if rule.key.trim().is_empty() {
                return Err(AppError::validation("ranking rule with empty key"));
            }
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Size of the worker pool shared by every secondary fetch
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Send `Referer: <base_url>` with every request
    #[serde(default = "defaults::send_referer")]
    pub send_referer: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            send_referer: defaults::send_referer(),
        }
    }
}

/// Description of one themed site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name of the source
    #[serde(default = "defaults::site_name")]
    pub name: String,

    /// Language tag, selects localized labels
    #[serde(default = "defaults::lang")]
    pub lang: String,

    /// Site root, without trailing slash
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Fetch the genre taxonomy from the site for the filter list
    #[serde(default = "defaults::fetch_taxonomy")]
    pub fetch_taxonomy: bool,

    /// chrono format of episode upload dates
    #[serde(default = "defaults::date_format")]
    pub date_format: String,

    #[serde(default)]
    pub paths: SitePaths,

    #[serde(default)]
    pub selectors: ThemeSelectors,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: defaults::site_name(),
            lang: defaults::lang(),
            base_url: defaults::base_url(),
            fetch_taxonomy: defaults::fetch_taxonomy(),
            date_format: defaults::date_format(),
            paths: SitePaths::default(),
            selectors: ThemeSelectors::default(),
        }
    }
}

impl SiteConfig {
    /// Parsed site root.
    pub fn base(&self) -> Result<Url> {
        Ok(Url::parse(self.base_url.trim_end_matches('/'))?)
    }

    /// Absolute URL for a site-relative path.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Ok(Url::parse(base)?);
        }
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

/// Request path templates, relative to the site root.
///
/// Placeholders: `{page}`, `{query}`, `{value}`, and `{post}`, `{type}`,
/// `{nume}` for player lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SitePaths {
    pub popular: String,
    pub latest: String,
    pub search: String,
    pub filter: String,
    /// Appended to `filter` when page > 1
    pub filter_page_suffix: String,
    pub taxonomy: String,
    pub player: String,
}

impl Default for SitePaths {
    fn default() -> Self {
        Self {
            popular: String::new(),
            latest: "episodes/page/{page}".to_string(),
            search: "page/{page}/?s={query}".to_string(),
            filter: "{value}".to_string(),
            filter_page_suffix: "/page/{page}".to_string(),
            taxonomy: String::new(),
            player: "wp-json/dooplayer/v1/post/{post}?type={type}&source={nume}".to_string(),
        }
    }
}

/// Case handling when matching a preference against a label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaseRule {
    Sensitive,
    #[default]
    Insensitive,
}

/// One preference key considered by the ranker, in priority order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankingRule {
    /// Preference store key
    pub key: String,

    /// Value used when the store has none
    #[serde(default)]
    pub default: String,

    #[serde(default)]
    pub case: CaseRule,
}

/// Ordered preference rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "defaults::ranking_rules")]
    pub rules: Vec<RankingRule>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            rules: defaults::ranking_rules(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Localized strings used by the pipeline and the filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub movie: String,
    pub season_prefix: String,
    pub select_filter: String,
    pub filter_header: String,
    pub taxonomy_missing: String,
    pub taxonomy_title: String,
    pub status_item: String,
    pub info_items: Vec<String>,
}

impl Labels {
    pub fn for_lang(lang: &str) -> Self {
        match lang {
            "pt-BR" => Self {
                movie: "Filme".into(),
                season_prefix: "Temporada".into(),
                select_filter: "<Selecione>".into(),
                filter_header: "NOTA: Filtros serão ignorados se usar a pesquisa por nome!"
                    .into(),
                taxonomy_missing: "Aperte 'Redefinir' para tentar mostrar os gêneros".into(),
                taxonomy_title: "Gênero".into(),
                status_item: "Status".into(),
                info_items: vec![
                    "Título".into(),
                    "Ano".into(),
                    "Temporadas".into(),
                    "Episódios".into(),
                ],
            },
            _ => Self {
                movie: "Movie".into(),
                season_prefix: "Season".into(),
                select_filter: "<Select>".into(),
                filter_header: "NOTE: Filters are going to be ignored if using search text!"
                    .into(),
                taxonomy_missing: "Press 'Reset' to attempt to show the genres".into(),
                taxonomy_title: "Genre".into(),
                status_item: "Status".into(),
                info_items: vec![
                    "Original".into(),
                    "First".into(),
                    "Last".into(),
                    "Seasons".into(),
                    "Episodes".into(),
                ],
            },
        }
    }
}

mod defaults {
    use super::{CaseRule, RankingRule};

    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; catalog-sources/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        5
    }
    pub fn send_referer() -> bool {
        true
    }

    // Site defaults
    pub fn site_name() -> String {
        "DooPlay".into()
    }
    pub fn lang() -> String {
        "en".into()
    }
    pub fn base_url() -> String {
        "https://dooplay.example".into()
    }
    pub fn fetch_taxonomy() -> bool {
        true
    }
    pub fn date_format() -> String {
        "%B. %d, %Y".into()
    }

    // Ranking defaults
    pub fn ranking_rules() -> Vec<RankingRule> {
        vec![RankingRule {
            key: "preferred_quality".into(),
            default: "720p".into(),
            case: CaseRule::Insensitive,
        }]
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.fetcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.fetcher.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_selector() {
        let mut config = Config::default();
        config.site.selectors.season_group = "[[broken".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("season_group"));
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn url_for_joins_without_double_slash() {
        let mut site = SiteConfig::default();
        site.base_url = "https://site.example/".to_string();
        assert_eq!(
            site.url_for("/tvshows/foo/").unwrap().as_str(),
            "https://site.example/tvshows/foo/"
        );
        assert_eq!(site.url_for("").unwrap().as_str(), "https://site.example/");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [site]
            base_url = "https://anime.example"
            lang = "pt-BR"

            [site.selectors]
            season_group = "div.seasons > div"

            [preferences]
            preferred_quality = "1080p"
            "#,
        )
        .unwrap();

        assert_eq!(config.site.base_url, "https://anime.example");
        assert_eq!(config.site.selectors.season_group, "div.seasons > div");
        assert_eq!(config.site.selectors.season_name, "span.se-t");
        assert_eq!(config.fetcher.max_concurrent, 5);
        assert_eq!(config.ranking.rules[0].key, "preferred_quality");
        assert_eq!(config.preferences["preferred_quality"], "1080p");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_file_and_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fetcher]\nmax_concurrent = 2\n").unwrap();

        assert_eq!(Config::load(&path).unwrap().fetcher.max_concurrent, 2);

        let missing = dir.path().join("missing.toml");
        assert!(Config::load(&missing).is_err());
        assert_eq!(Config::load_or_default(&missing).fetcher.max_concurrent, 5);
    }

    #[test]
    fn labels_are_localized() {
        assert_eq!(Labels::for_lang("pt-BR").movie, "Filme");
        assert_eq!(Labels::for_lang("en").movie, "Movie");
        assert_eq!(Labels::for_lang("de").select_filter, "<Select>");
    }
}
