// src/themes/dooplay.rs

//! Mappers for the DooPlay WordPress theme.
//!
//! All selectors come from `site.selectors`, so a site that only tweaks
//! markup needs a config change rather than new code.

use scraper::{ElementRef, Html};
use serde::Deserialize;
use url::Url;

use crate::adapter::{SiteAdapterConfig, SiteMappers};
use crate::error::{AppError, Result};
use crate::fetcher::Document;
use crate::models::{Alternative, Entry, EntryStatus, Episode, SiteConfig, TaxonomyEntry};
use crate::utils::text::{
    element_text, image_url, own_text, parse_episode_number, parse_upload_date,
};
use crate::utils::{fill_template, parse_selector};

/// Mapper set for the theme.
pub fn mappers() -> SiteMappers {
    SiteMappers {
        entry: entry_from_element,
        search_entry: search_entry_from_element,
        details: details_from_document,
        season_name,
        episode: episode_from_element,
        alternative: alternative_from_element,
        resolve_alternative: Some(resolve_player),
        taxonomy: taxonomy_from_document,
    }
}

/// Adapter for a DooPlay site.
pub fn adapter(site: SiteConfig, send_referer: bool) -> Result<SiteAdapterConfig> {
    SiteAdapterConfig::new(site, mappers(), send_referer)
}

fn first<'a>(element: ElementRef<'a>, selector: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(element.select(&parse_selector(selector)?).next())
}

fn require<'a>(element: ElementRef<'a>, selector: &str, context: &str) -> Result<ElementRef<'a>> {
    first(element, selector)?.ok_or_else(|| AppError::missing(selector, context))
}

/// Popular, latest and filter listing item.
fn entry_from_element(element: ElementRef<'_>, adapter: &SiteAdapterConfig) -> Result<Entry> {
    let img = require(element, "img", "listing entry")?;
    let href = first(element, "a")?
        .and_then(|a| a.value().attr("href"))
        .or_else(|| element.value().attr("href"))
        .ok_or_else(|| AppError::missing("a[href]", "listing entry"))?;

    let mut entry = Entry::new(
        adapter.relative_path(href),
        img.value().attr("alt").unwrap_or_default().trim(),
    );
    entry.thumbnail_url = image_url(&img, &adapter.base);
    Ok(entry)
}

/// Free-text search result item.
fn search_entry_from_element(element: ElementRef<'_>, adapter: &SiteAdapterConfig) -> Result<Entry> {
    let href = element
        .value()
        .attr("href")
        .ok_or_else(|| AppError::missing("href", "search entry"))?;
    let img = require(element, "img", "search entry")?;

    let mut entry = Entry::new(
        adapter.relative_path(href),
        img.value().attr("alt").unwrap_or_default().trim(),
    );
    entry.thumbnail_url = image_url(&img, &adapter.base);
    Ok(entry)
}

/// `"\n{key}: {value}"` for the first info row whose text contains `item`.
fn info_line(info: ElementRef<'_>, item: &str, adapter: &SiteAdapterConfig) -> Result<Option<String>> {
    let sel = &adapter.site.selectors;
    let field_sel = parse_selector(&sel.info_field)?;
    let Some(field) = info
        .select(&field_sel)
        .find(|f| f.text().collect::<String>().contains(item))
    else {
        return Ok(None);
    };

    let key = first(field, &sel.info_field_key)?.map(|e| element_text(&e));
    let value = first(field, &sel.info_field_value)?.map(|e| element_text(&e));
    Ok(match (key, value) {
        (Some(key), Some(value)) => Some(format!("\n{key}: {value}")),
        _ => None,
    })
}

fn info_value(info: ElementRef<'_>, item: &str, adapter: &SiteAdapterConfig) -> Result<Option<String>> {
    Ok(info_line(info, item, adapter)?
        .and_then(|line| line.split_once(": ").map(|(_, v)| v.to_string())))
}

/// Canonical details page.
fn details_from_document(doc: &Html, location: &Url, adapter: &SiteAdapterConfig) -> Result<Entry> {
    let sel = &adapter.site.selectors;
    let root = doc.root_element();
    let header = require(root, &sel.details_header, "details page")?;

    let mut entry = Entry::new(adapter.relative_path(location.as_str()), "");

    if let Some(poster) = first(header, &sel.details_poster)? {
        entry.thumbnail_url = image_url(&poster, &adapter.base);
        entry.title = poster.value().attr("alt").unwrap_or_default().trim().to_string();
    }
    if entry.title.is_empty() {
        let heading = require(header, &sel.details_title, "details header")?;
        entry.title = element_text(&heading);
    }

    let genre_sel = parse_selector(&sel.details_genres)?;
    entry.genres = header.select(&genre_sel).map(|a| element_text(&a)).collect();

    if let Some(info) = first(root, &sel.details_info)? {
        let mut description = first(root, &sel.details_description)?
            .map(|p| format!("{}\n", element_text(&p)))
            .unwrap_or_default();
        for item in &adapter.labels.info_items {
            if let Some(line) = info_line(info, item, adapter)? {
                description.push_str(&line);
            }
        }
        let description = description.trim();
        if !description.is_empty() {
            entry.description = Some(description.to_string());
        }

        let status = info_value(info, &adapter.labels.status_item, adapter)?;
        entry.status = EntryStatus::parse(status.as_deref());
    }

    Ok(entry)
}

fn season_name(season: ElementRef<'_>, adapter: &SiteAdapterConfig) -> Result<String> {
    let name = require(season, &adapter.site.selectors.season_name, "season group")?;
    Ok(element_text(&name))
}

fn format_number(n: f32) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn episode_from_element(
    element: ElementRef<'_>,
    season: &str,
    adapter: &SiteAdapterConfig,
) -> Result<Episode> {
    let sel = &adapter.site.selectors;
    let number_label = require(element, &sel.episode_number, "episode")?;
    let number = parse_episode_number(&element_text(&number_label));

    let link = require(element, &sel.episode_link, "episode")?;
    let href = link
        .value()
        .attr(&sel.attr_name)
        .ok_or_else(|| AppError::missing(&sel.attr_name, "episode link"))?;

    let name = format!(
        "{} {} x {} - {}",
        adapter.labels.season_prefix,
        season,
        format_number(number),
        own_text(&link)
    );

    let mut episode = Episode::new(number, name, adapter.relative_path(href));
    episode.upload_timestamp = first(element, &sel.episode_date)?
        .map(|d| parse_upload_date(&element_text(&d), &adapter.site.date_format))
        .unwrap_or(0);
    Ok(episode)
}

/// Player option; the playable URL is looked up through the player endpoint.
fn alternative_from_element(element: ElementRef<'_>, adapter: &SiteAdapterConfig) -> Result<Alternative> {
    let attr = |name: &str| {
        element
            .value()
            .attr(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::missing(format!("[{name}]"), "player option"))
    };
    let post = attr("data-post")?;
    let kind = attr("data-type")?;
    let nume = attr("data-nume")?;

    let label = first(element, "span.title")?
        .map(|t| element_text(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| element_text(&element));

    let path = fill_template(
        &adapter.site.paths.player,
        &[("post", post), ("type", kind), ("nume", nume)],
    );
    let url = adapter.site.url_for(&path)?;
    Ok(Alternative::placeholder(url.to_string(), label))
}

#[derive(Deserialize)]
struct PlayerResponse {
    embed_url: String,
}

fn resolve_player(doc: &Document, placeholder: Alternative, _adapter: &SiteAdapterConfig) -> Result<Alternative> {
    let player: PlayerResponse = doc.json()?;
    let embed = player.embed_url.trim();
    if embed.is_empty() {
        return Err(AppError::mapping(
            doc.location.as_str(),
            "player response has an empty embed_url",
        ));
    }

    Ok(Alternative {
        resource_url: embed.to_string(),
        unresolved: false,
        ..placeholder
    })
}

/// Genre links from the site menu, without the synthetic sentinel.
fn taxonomy_from_document(doc: &Html, adapter: &SiteAdapterConfig) -> Result<Vec<TaxonomyEntry>> {
    let sel = &adapter.site.selectors;
    let menu_sel = parse_selector(&sel.taxonomy_menu)?;
    let item_sel = parse_selector(&sel.taxonomy_item)?;
    let link_sel = parse_selector("a")?;
    let title = &adapter.labels.taxonomy_title;

    let Some(menu) = doc.select(&menu_sel).find(|menu| {
        menu.select(&link_sel)
            .next()
            .is_some_and(|a| element_text(&a).contains(title.as_str()))
    }) else {
        return Ok(Vec::new());
    };

    let prefix = format!("{}/", adapter.site.base_url.trim_end_matches('/'));
    Ok(menu
        .select(&item_sel)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let value = href
                .strip_prefix(&prefix)
                .unwrap_or_else(|| href.trim_start_matches('/'));
            Some(TaxonomyEntry::new(element_text(&a), value))
        })
        .collect())
}
