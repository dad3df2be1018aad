//! URL handling for roster links
//!
//! Archive pages mix absolute and relative hrefs, and author rosters point
//! at in-page anchors (`person74.html#sakuhin_list_1`). Everything that
//! leaves this module is absolute, http(s), and fragment-free.

use url::Url;

/// Resolves a link href against a base URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs (same page anchors)
/// - javascript:, mailto:, tel:, data: schemes
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use litlite::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.aozora.gr.jp/index_pages/person_all.html").unwrap();
/// let url = resolve_link("person74.html#sakuhin_list_1", &base).unwrap();
/// assert_eq!(url.as_str(), "https://www.aozora.gr.jp/index_pages/person74.html");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut url = base_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

/// Joins a site-relative path onto the archive root
pub fn join_path(base_url: &str, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(base_url)?.join(path)
}
