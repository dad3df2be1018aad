//! Full-text link resolution on work landing pages
//!
//! A card page lists several renderings of a work (ruby zip, plain zip,
//! XHTML). The XHTML rendering lives under `files/` and ends in `.html`;
//! the first such link in document order is the one we read.

use crate::scrape::listing::{find_first_link, LinkPredicate};
use scraper::Html;
use url::Url;

/// Locates the full-text HTML rendering linked from a landing page
#[derive(Debug, Clone)]
pub struct TextResolver {
    predicate: LinkPredicate,
}

impl TextResolver {
    /// Creates a resolver requiring every marker in the href
    pub fn new(markers: &[String]) -> Self {
        Self {
            predicate: LinkPredicate::AllOf(markers.to_vec()),
        }
    }

    /// Returns the first matching link, or None when the page has no
    /// full-text rendering
    pub fn resolve(&self, landing: &Html, landing_url: &Url) -> Option<Url> {
        find_first_link(landing, landing_url, &self.predicate)
    }
}

impl Default for TextResolver {
    fn default() -> Self {
        Self::new(&["files/".to_string(), ".html".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landing_url() -> Url {
        Url::parse("https://www.aozora.gr.jp/cards/000035/card1567.html").unwrap()
    }

    #[test]
    fn test_resolves_xhtml_rendering() {
        let html = Html::parse_document(
            r#"<table class="download">
                <tr><td><a href="./files/1567_ruby_4948.zip">1567_ruby_4948.zip</a></td></tr>
                <tr><td><a href="./files/1567_14913.html">1567_14913.html</a></td></tr>
            </table>"#,
        );

        let url = TextResolver::default().resolve(&html, &landing_url()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.aozora.gr.jp/cards/000035/files/1567_14913.html"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let html = Html::parse_document(
            r#"<a href="./files/1567_first.html">a</a>
               <a href="./files/1567_second.html">b</a>"#,
        );

        let url = TextResolver::default().resolve(&html, &landing_url()).unwrap();
        assert!(url.as_str().ends_with("1567_first.html"));
    }

    #[test]
    fn test_not_found_with_only_unrelated_links() {
        let html = Html::parse_document(
            r#"<a href="../../index.html">トップ</a>
               <a href="../../index_pages/person35.html">太宰 治</a>
               <a href="./files/1567_ruby_4948.zip">zip</a>
               <a href="https://example.com/about.html">about</a>"#,
        );

        assert!(TextResolver::default().resolve(&html, &landing_url()).is_none());
    }

    #[test]
    fn test_custom_markers() {
        let html = Html::parse_document(r#"<a href="/texts/1567.xhtml">text</a>"#);
        let resolver = TextResolver::new(&["texts/".to_string(), ".xhtml".to_string()]);
        assert!(resolver.resolve(&html, &landing_url()).is_some());
    }
}
