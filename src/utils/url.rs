//! URL helpers for catalog hrefs.

use url::Url;

fn join(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Absolute form of an href found on a site page.
///
/// Falls back to the raw href when it cannot be joined onto `base`.
pub fn absolute_url(base: &Url, href: &str) -> String {
    join(base, href).map_or_else(|| href.to_string(), String::from)
}

/// Strip scheme and host, keeping path, query and fragment.
///
/// Relative hrefs are first resolved against `base`.
///
/// # Examples
/// ```
/// use catalog_sources::utils::url::path_without_domain;
/// use url::Url;
///
/// let base = Url::parse("https://site.example/").unwrap();
/// assert_eq!(
///     path_without_domain(&base, "https://site.example/tvshows/foo/?x=1"),
///     "/tvshows/foo/?x=1"
/// );
/// ```
pub fn path_without_domain(base: &Url, href: &str) -> String {
    let Some(url) = join(base, href) else {
        return href.to_string();
    };
    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://site.example/tvshows/foo/").unwrap()
    }

    #[test]
    fn test_absolute_poster_urls() {
        let base = base();
        assert_eq!(
            absolute_url(&base, "/wp-content/uploads/foo.jpg"),
            "https://site.example/wp-content/uploads/foo.jpg"
        );
        assert_eq!(
            absolute_url(&base, "//cdn.example/w185/foo.jpg"),
            "https://cdn.example/w185/foo.jpg"
        );
        assert_eq!(
            absolute_url(&base, " season-2.jpg "),
            "https://site.example/tvshows/foo/season-2.jpg"
        );
    }

    #[test]
    fn test_path_without_domain() {
        let base = base();
        assert_eq!(
            path_without_domain(&base, "https://site.example/episodes/foo-1x2/"),
            "/episodes/foo-1x2/"
        );
        assert_eq!(path_without_domain(&base, "/movies/bar"), "/movies/bar");
        assert_eq!(
            path_without_domain(&base, "/genre/action/#top"),
            "/genre/action/#top"
        );
        assert_eq!(
            path_without_domain(&base, "../../page/2/?s=foo"),
            "/page/2/?s=foo"
        );
    }
}
