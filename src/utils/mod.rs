//! Utility functions and helpers.

pub mod http;
pub mod text;
pub mod url;

use scraper::Selector;

use crate::error::{AppError, Result};

pub use self::url::{absolute_url, path_without_domain};

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Substitute `{name}` placeholders in a path template.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Percent-encode a free-text query for use inside a URL.
pub fn encode_query(query: &str) -> String {
    ::url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect()
}
