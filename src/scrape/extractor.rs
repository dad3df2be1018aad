//! Plain-text extraction from full-text pages
//!
//! Extraction steps:
//! 1. Find the main text container (`div.main_text` on the archive); fall
//!    back to `<body>` for pages with older markup
//! 2. Collect text nodes, skipping ruby readings (`<rt>`, `<rp>`) and
//!    script/style content
//! 3. Strip inline annotations: `《…》` readings, `［＃…］` editorial notes,
//!    and the `｜` ruby separator
//! 4. Trim every line and drop the empty ones

use crate::LitError;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use url::Url;

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("hardcoded selector is valid"));

static ANNOTATIONS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"《.*?》").expect("hardcoded regex pattern is valid"),
        Regex::new(r"［＃.*?］").expect("hardcoded regex pattern is valid"),
        Regex::new(r"｜").expect("hardcoded regex pattern is valid"),
    ]
});

/// Elements whose text never belongs to the reading text
const SKIPPED_ELEMENTS: &[&str] = &["rt", "rp", "script", "style"];

/// Extracts cleaned text from a full-text page
#[derive(Debug, Clone)]
pub struct TextExtractor {
    content: Selector,
}

impl TextExtractor {
    /// Creates an extractor for the given content container selector
    pub fn new(content_selector: &str) -> Result<Self, LitError> {
        let content = Selector::parse(content_selector).map_err(|e| LitError::Parse {
            url: String::new(),
            message: format!("invalid content selector '{}': {:?}", content_selector, e),
        })?;
        Ok(Self { content })
    }

    /// Extracts the cleaned plain text of a document
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Cleaned text, one non-empty trimmed line per line
    /// * `Err(LitError::Parse)` - Neither the content container nor a body exists
    pub fn extract(&self, document: &Html, url: &Url) -> Result<String, LitError> {
        let container = document
            .select(&self.content)
            .next()
            .or_else(|| {
                tracing::debug!("no content container on {}, falling back to body", url);
                document.select(&BODY).next()
            })
            .ok_or_else(|| LitError::Parse {
                url: url.to_string(),
                message: "page has neither a content container nor a body".to_string(),
            })?;

        Ok(clean_text(&collect_text(container)))
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            content: Selector::parse("div.main_text").expect("hardcoded selector is valid"),
        }
    }
}

/// Joins the element's reading-text nodes, one node per line
fn collect_text(container: ElementRef) -> String {
    let mut lines = Vec::new();

    for node in container.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if skipped {
            continue;
        }

        let text = text.trim();
        if !text.is_empty() {
            lines.push(text);
        }
    }

    lines.join("\n")
}

/// Strips annotations and normalizes lines
///
/// Substitution repeats until nothing matches, so removing one annotation
/// can never leave another behind (`［［＃a］＃b］`).
pub fn clean_text(text: &str) -> String {
    let mut text = text.to_string();

    loop {
        let mut changed = false;
        for pattern in ANNOTATIONS.iter() {
            if pattern.is_match(&text) {
                text = pattern.replace_all(&text, "").into_owned();
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://www.aozora.gr.jp/cards/000035/files/1567_14913.html").unwrap()
    }

    fn has_annotation(text: &str) -> bool {
        ANNOTATIONS.iter().any(|p| p.is_match(text))
    }

    #[test]
    fn test_extracts_main_text_container() {
        let html = Html::parse_document(
            r#"<html><body>
                <h1 class="title">走れメロス</h1>
                <div class="main_text">
                    メロスは激怒した。<br />
                    必ず、かの邪智暴虐の王を除かなければならぬと決意した。
                </div>
                <div class="bibliographical_information">底本：「太宰治全集3」</div>
            </body></html>"#,
        );

        let text = TextExtractor::default().extract(&html, &url()).unwrap();
        assert_eq!(
            text,
            "メロスは激怒した。\n必ず、かの邪智暴虐の王を除かなければならぬと決意した。"
        );
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = Html::parse_document(
            r#"<html><body><p>  或日の暮方の事である。  </p><p>一人の下人が、羅生門の下で雨やみを待っていた。</p></body></html>"#,
        );

        let text = TextExtractor::default().extract(&html, &url()).unwrap();
        assert_eq!(
            text,
            "或日の暮方の事である。\n一人の下人が、羅生門の下で雨やみを待っていた。"
        );
    }

    #[test]
    fn test_ruby_readings_dropped() {
        let html = Html::parse_document(
            r#"<div class="main_text"><ruby><rb>邪智暴虐</rb><rp>（</rp><rt>じゃちぼうぎゃく</rt><rp>）</rp></ruby>の王</div>"#,
        );

        let text = TextExtractor::default().extract(&html, &url()).unwrap();
        assert!(!text.contains("じゃちぼうぎゃく"));
        assert!(!text.contains('（'));
        assert!(text.contains("邪智暴虐"));
    }

    #[test]
    fn test_script_and_style_skipped_in_body_fallback() {
        let html = Html::parse_document(
            r#"<html><head><style>p { color: red; }</style></head>
               <body><script>var x = 1;</script><p>本文</p></body></html>"#,
        );

        let text = TextExtractor::default().extract(&html, &url()).unwrap();
        assert_eq!(text, "本文");
    }

    #[test]
    fn test_custom_selector() {
        let html = Html::parse_document(
            r#"<body><nav>menu</nav><article id="text">本文です</article></body>"#,
        );
        let extractor = TextExtractor::new("article#text").unwrap();
        assert_eq!(extractor.extract(&html, &url()).unwrap(), "本文です");
    }

    #[test]
    fn test_invalid_selector_rejected() {
        assert!(TextExtractor::new("div[").is_err());
    }

    #[test]
    fn test_clean_text_strips_annotations() {
        let raw = "｜邪智暴虐《じゃちぼうぎゃく》の王\n［＃ここから２字下げ］\n  メロスは激怒した。  \n\n［＃ここで字下げ終わり］";
        let cleaned = clean_text(raw);

        assert_eq!(cleaned, "邪智暴虐の王\nメロスは激怒した。");
        assert!(!has_annotation(&cleaned));
    }

    #[test]
    fn test_clean_text_nested_annotations() {
        let cleaned = clean_text("前［［＃a］＃b］後 《《x》》");
        assert!(!has_annotation(&cleaned));
        assert_eq!(cleaned, "前後 》");
    }

    #[test]
    fn test_clean_text_never_leaves_annotations() {
        let samples = [
            "《》《《》》",
            "［＃［＃］］",
            "｜｜｜",
            "a《b\nc》d",
            "［＃注］《よみ》｜本文",
            "普通の文章。",
            "",
        ];

        for sample in samples {
            let cleaned = clean_text(sample);
            assert!(!has_annotation(&cleaned), "annotation survived in {:?}", cleaned);
            assert!(cleaned.lines().all(|l| !l.is_empty() && l.trim() == l));
        }
    }
}
