// src/models/selectors.rs

//! CSS selectors for scraping a themed site.

use serde::{Deserialize, Serialize};

/// CSS selectors used by the theme pipeline and its default mappers.
///
/// Defaults reproduce the DooPlay WordPress theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeSelectors {
    /// Each item of the popular feed
    pub popular_entry: String,

    /// Next-page marker of the popular feed (none: single page)
    pub popular_next_page: Option<String>,

    /// Each item of the latest feed and of filter listings
    pub latest_entry: String,

    /// Each item of a free-text search result
    pub search_entry: String,

    /// Next-page marker shared by latest, search and filter listings
    pub next_page: String,

    /// Navigation marker found only on subordinate (episode) pages
    pub canonical_marker: String,

    /// Season group containers on a details page
    pub season_group: String,

    /// Season display name within a group
    pub season_name: String,

    /// Link to a season's own episode page, for sites that split seasons
    pub season_link: Option<String>,

    /// Each episode element inside a season group
    pub episode_item: String,

    /// Label carrying the episode number as its numeric suffix
    pub episode_number: String,

    /// Link to the episode resource
    pub episode_link: String,

    /// Upload date label inside an episode element
    pub episode_date: String,

    /// Header block of a details page
    pub details_header: String,

    /// Poster image inside the header
    pub details_poster: String,

    /// Title heading used when the poster has no alt text
    pub details_title: String,

    /// Genre links inside the header
    pub details_genres: String,

    /// Additional info block
    pub details_info: String,

    /// Synopsis paragraph
    pub details_description: String,

    /// One `key: value` row inside the info block
    pub info_field: String,

    pub info_field_key: String,

    pub info_field_value: String,

    /// Menu entries that may hold the genre sub-menu
    pub taxonomy_menu: String,

    /// Genre links inside the matching menu entry
    pub taxonomy_item: String,

    /// Player options on an episode page
    pub alternative_item: String,

    /// HTML attribute for extracting links (usually "href")
    pub attr_name: String,
}

impl Default for ThemeSelectors {
    fn default() -> Self {
        Self {
            popular_entry: "article.w_item_a > a".to_string(),
            popular_next_page: None,
            latest_entry: "div.content article > div.poster".to_string(),
            search_entry: "div.result-item div.image a".to_string(),
            next_page: "div.resppages > a > span.fa-chevron-right".to_string(),
            canonical_marker: "div.pag_episodes div.item a[href] i.fa-bars".to_string(),
            season_group: "div#seasons > div".to_string(),
            season_name: "span.se-t".to_string(),
            season_link: None,
            episode_item: "ul.episodios > li".to_string(),
            episode_number: "div.numerando".to_string(),
            episode_link: "a[href]".to_string(),
            episode_date: ".date".to_string(),
            details_header: "div.sheader".to_string(),
            details_poster: "div.poster > img".to_string(),
            details_title: "div.data > h1".to_string(),
            details_genres: "div.data > div.sgeneros > a".to_string(),
            details_info: "div#info".to_string(),
            details_description: "div#info p".to_string(),
            info_field: "div.custom_fields".to_string(),
            info_field_key: "b".to_string(),
            info_field_value: "span".to_string(),
            taxonomy_menu: "li.menu-item-has-children".to_string(),
            taxonomy_item: "ul.sub-menu li > a".to_string(),
            alternative_item: "ul#playeroptionsul > li".to_string(),
            attr_name: "href".to_string(),
        }
    }
}

impl ThemeSelectors {
    /// Every configured selector string with its field name.
    pub fn all(&self) -> Vec<(&'static str, &str)> {
        let mut all = vec![
            ("popular_entry", self.popular_entry.as_str()),
            ("latest_entry", self.latest_entry.as_str()),
            ("search_entry", self.search_entry.as_str()),
            ("next_page", self.next_page.as_str()),
            ("canonical_marker", self.canonical_marker.as_str()),
            ("season_group", self.season_group.as_str()),
            ("season_name", self.season_name.as_str()),
            ("episode_item", self.episode_item.as_str()),
            ("episode_number", self.episode_number.as_str()),
            ("episode_link", self.episode_link.as_str()),
            ("episode_date", self.episode_date.as_str()),
            ("details_header", self.details_header.as_str()),
            ("details_poster", self.details_poster.as_str()),
            ("details_title", self.details_title.as_str()),
            ("details_genres", self.details_genres.as_str()),
            ("details_info", self.details_info.as_str()),
            ("details_description", self.details_description.as_str()),
            ("info_field", self.info_field.as_str()),
            ("info_field_key", self.info_field_key.as_str()),
            ("info_field_value", self.info_field_value.as_str()),
            ("taxonomy_menu", self.taxonomy_menu.as_str()),
            ("taxonomy_item", self.taxonomy_item.as_str()),
            ("alternative_item", self.alternative_item.as_str()),
        ];
        if let Some(s) = &self.popular_next_page {
            all.push(("popular_next_page", s.as_str()));
        }
        if let Some(s) = &self.season_link {
            all.push(("season_link", s.as_str()));
        }
        all
    }
}
