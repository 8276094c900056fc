//! Text extraction helpers shared by the theme mappers.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::ElementRef;
use url::Url;

static NUMERIC_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*$").expect("numeric suffix regex is valid")
});

/// Parse the numeric suffix of a label (`"1 - 12"` → `12.0`), `0.0` if none.
pub fn parse_episode_number(label: &str) -> f32 {
    NUMERIC_SUFFIX
        .captures(label.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Parse a date label into epoch millis using a chrono format, `0` on failure.
pub fn parse_upload_date(text: &str, format: &str) -> i64 {
    NaiveDate::parse_from_str(text.trim(), format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All descendant text of an element, whitespace-normalized.
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Text of the element's direct text children only.
pub fn own_text(element: &ElementRef<'_>) -> String {
    let raw: String = element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    normalize_whitespace(&raw)
}

/// Best-effort image URL from lazy-loading attributes, resolved against `base`.
pub fn image_url(img: &ElementRef<'_>, base: &Url) -> Option<String> {
    let attrs = img.value();
    let raw = if let Some(v) = attrs.attr("data-src") {
        v
    } else if let Some(v) = attrs.attr("data-lazy-src") {
        v
    } else if let Some(v) = attrs.attr("srcset") {
        v.split_whitespace().next().unwrap_or_default()
    } else {
        attrs.attr("src")?
    };

    let raw = raw.split("?resize").next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    Some(super::absolute_url(base, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_parse_episode_number() {
        assert_eq!(parse_episode_number("1 - 12"), 12.0);
        assert_eq!(parse_episode_number("2 - 7.5 "), 7.5);
        assert_eq!(parse_episode_number("Special"), 0.0);
        assert_eq!(parse_episode_number(""), 0.0);
    }

    #[test]
    fn test_parse_upload_date() {
        assert_eq!(parse_upload_date("Jan. 02, 2023", "%b. %d, %Y"), 1_672_617_600_000);
        assert_eq!(parse_upload_date("March. 05, 2021", "%B. %d, %Y"), 1_614_902_400_000);
        assert_eq!(parse_upload_date("yesterday", "%B. %d, %Y"), 0);
    }

    #[test]
    fn test_own_text_skips_children() {
        let html = Html::parse_fragment(r#"<a href="/x">Pilot <span>HD</span></a>"#);
        let sel = Selector::parse("a").unwrap();
        let a = html.select(&sel).next().unwrap();
        assert_eq!(own_text(&a), "Pilot");
        assert_eq!(element_text(&a), "Pilot HD");
    }

    #[test]
    fn test_image_url_prefers_lazy_attributes() {
        let base = Url::parse("https://site.example/").unwrap();
        let html = Html::parse_fragment(
            r#"<img data-src="/img/a.jpg?resize=100" src="/img/placeholder.gif">
               <img srcset="/img/b.jpg 300w, /img/b2.jpg 600w">
               <img src="https://cdn.example/c.jpg">
               <img alt="none">"#,
        );
        let sel = Selector::parse("img").unwrap();
        let urls: Vec<_> = html.select(&sel).map(|img| image_url(&img, &base)).collect();
        assert_eq!(
            urls,
            vec![
                Some("https://site.example/img/a.jpg".to_string()),
                Some("https://site.example/img/b.jpg".to_string()),
                Some("https://cdn.example/c.jpg".to_string()),
                None,
            ]
        );
    }
}
