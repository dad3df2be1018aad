//! Roster extraction from listing pages
//!
//! The same extractor builds the author roster (from the index of all
//! authors) and each author's work roster (from the author page). Links are
//! selected by a `LinkPredicate` evaluated on the raw href, resolved
//! against the page URL, stripped of fragments, and deduplicated.

use crate::url::resolve_link;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("hardcoded selector is valid"));

/// A labelled link discovered on a listing page
///
/// Author rosters and work rosters share this shape: the label is the
/// author name or the work title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RosterEntry {
    /// Anchor text, trimmed
    pub label: String,

    /// Absolute, fragment-free URL
    pub url: Url,
}

/// Which hrefs count as roster links
#[derive(Debug, Clone)]
pub enum LinkPredicate {
    /// The href contains the marker
    Contains(String),

    /// The href contains every marker
    AllOf(Vec<String>),

    /// The href matches the pattern
    Pattern(Regex),
}

impl LinkPredicate {
    /// Builds a predicate from a substring marker and an optional regex override
    pub fn from_config(marker: &str, pattern: Option<&str>) -> Result<Self, regex::Error> {
        match pattern {
            Some(pattern) => Ok(Self::Pattern(Regex::new(pattern)?)),
            None => Ok(Self::Contains(marker.to_string())),
        }
    }

    /// Tests a raw href
    pub fn matches(&self, href: &str) -> bool {
        match self {
            Self::Contains(marker) => href.contains(marker.as_str()),
            Self::AllOf(markers) => markers.iter().all(|m| href.contains(m.as_str())),
            Self::Pattern(regex) => regex.is_match(href),
        }
    }
}

/// Extracts a deduplicated, ordered roster from a parsed document
///
/// # Rules
///
/// - only `<a href>` elements whose href satisfies `predicate`
/// - labels of one character or less are skipped (icons, arrows)
/// - URLs are resolved against `base_url` with fragments removed
/// - duplicates by exact (label, url) are dropped, first occurrence wins
///
/// # Example
///
/// ```
/// use litlite::scrape::{extract_listing, LinkPredicate};
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<ol><li><a href="person35.html#sakuhin_list_1">太宰 治</a></li></ol>"#);
/// let base = Url::parse("https://www.aozora.gr.jp/index_pages/person_all.html").unwrap();
/// let roster = extract_listing(&html, &base, &LinkPredicate::Contains("person".into()));
/// assert_eq!(roster[0].label, "太宰 治");
/// assert_eq!(roster[0].url.as_str(), "https://www.aozora.gr.jp/index_pages/person35.html");
/// ```
pub fn extract_listing(
    document: &Html,
    base_url: &Url,
    predicate: &LinkPredicate,
) -> Vec<RosterEntry> {
    let mut seen = HashSet::new();
    let mut roster = Vec::new();

    for (href, element) in matching_anchors(document, predicate) {
        let label = anchor_label(&element);
        if label.chars().count() <= 1 {
            continue;
        }

        let Some(url) = resolve_link(href, base_url) else {
            continue;
        };

        let entry = RosterEntry { label, url };
        if seen.insert(entry.clone()) {
            roster.push(entry);
        }
    }

    roster
}

/// Returns the first link, in document order, whose href satisfies `predicate`
pub fn find_first_link(document: &Html, base_url: &Url, predicate: &LinkPredicate) -> Option<Url> {
    matching_anchors(document, predicate).find_map(|(href, _)| resolve_link(href, base_url))
}

fn matching_anchors<'a>(
    document: &'a Html,
    predicate: &'a LinkPredicate,
) -> impl Iterator<Item = (&'a str, ElementRef<'a>)> + 'a {
    document.select(&ANCHOR).filter_map(move |element| {
        let href = element.value().attr("href")?;
        predicate.matches(href).then_some((href, element))
    })
}

fn anchor_label(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
