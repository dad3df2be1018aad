//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the HTTP client with a proper user agent string
//! - Single-shot GET requests bounded by the configured timeout
//! - Error classification into `FetchError`
//! - Character-set detection from the response bytes
//!
//! The archive serves a mix of Shift_JIS, EUC-JP and UTF-8 pages, often
//! with no charset in the Content-Type header, so the body is never
//! assumed to be UTF-8.

use crate::config::{ScraperConfig, UserAgentConfig};
use encoding_rs::Encoding;
use regex::bytes::Regex;
use reqwest::{header, Client};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// How far into the document to look for a `<meta>` charset declaration
const META_SNIFF_BYTES: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_\-:.]+)"#)
        .expect("hardcoded regex pattern is valid")
});

/// Failure of a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("connection failed for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::Connection { url, .. }
            | Self::Body { url, .. } => url,
        }
    }

    fn from_reqwest(url: &Url, e: reqwest::Error) -> Self {
        let url = url.to_string();
        if e.is_timeout() {
            Self::Timeout { url }
        } else if e.is_connect() {
            Self::Connection {
                url,
                message: e.to_string(),
            }
        } else {
            Self::Body {
                url,
                message: e.to_string(),
            }
        }
    }
}

/// A successfully fetched and decoded page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against this
    pub url: Url,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, if any
    pub content_type: Option<String>,

    /// Name of the encoding the body was decoded with
    pub encoding: &'static str,

    /// Decoded page body
    pub body: String,
}

impl FetchedPage {
    /// Parses the body into an HTML document
    pub fn parse(&self) -> scraper::Html {
        scraper::Html::parse_document(&self.body)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use litlite::config::UserAgentConfig;
/// use litlite::scrape::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Single-request page fetcher
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    fallback: &'static Encoding,
}

impl PageFetcher {
    /// Creates a fetcher from the scraper and user agent configuration
    pub fn new(scraper: &ScraperConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            user_agent,
            Duration::from_secs(scraper.request_timeout_secs),
        )?;
        let fallback = Encoding::for_label(scraper.fallback_encoding.as_bytes())
            .unwrap_or(encoding_rs::SHIFT_JIS);
        Ok(Self { client, fallback })
    }

    /// Fetches a URL with a single GET
    ///
    /// Any non-2xx status, timeout, or transport failure is returned as a
    /// `FetchError`; the caller decides whether to skip the item or abort.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let (body, encoding) = decode_body(&bytes, content_type.as_deref(), self.fallback);

        tracing::debug!(
            "fetched {} ({} bytes, {})",
            final_url,
            bytes.len(),
            encoding.name()
        );

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            content_type,
            encoding: encoding.name(),
            body,
        })
    }
}

/// Decodes a response body, detecting its character set
///
/// Detection order: byte-order mark, `charset=` in the Content-Type header,
/// `<meta>` declaration in the head of the document, valid UTF-8, and
/// finally the fallback encoding.
pub fn decode_body(
    bytes: &[u8],
    content_type: Option<&str>,
    fallback: &'static Encoding,
) -> (String, &'static Encoding) {
    let encoding = detect_encoding(bytes, content_type, fallback);
    let (text, actual, _had_errors) = encoding.decode(bytes);
    (text.into_owned(), actual)
}

/// Picks the encoding for a body without decoding it
pub fn detect_encoding(
    bytes: &[u8],
    content_type: Option<&str>,
    fallback: &'static Encoding,
) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(encoding) = content_type.and_then(charset_from_content_type) {
        return encoding;
    }

    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    if let Some(encoding) = META_CHARSET
        .captures(head)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return encoding_rs::UTF_8;
    }

    fallback
}

/// Extracts and resolves the `charset` parameter of a Content-Type value
fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Encoding::for_label(value.trim().trim_matches('"').as_bytes())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_jis(text: &str) -> Vec<u8> {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(text);
        bytes.into_owned()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_header_charset_wins_over_fallback() {
        let bytes = "走れメロス".as_bytes();
        let encoding = detect_encoding(
            bytes,
            Some("text/html; charset=UTF-8"),
            encoding_rs::SHIFT_JIS,
        );
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_meta_charset_detected_from_bytes() {
        let mut bytes =
            b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html;charset=Shift_JIS\"></head><body>"
                .to_vec();
        bytes.extend(shift_jis("羅生門"));
        bytes.extend(b"</body></html>");

        let (text, encoding) = decode_body(&bytes, Some("text/html"), encoding_rs::UTF_8);
        assert_eq!(encoding, encoding_rs::SHIFT_JIS);
        assert!(text.contains("羅生門"));
    }

    #[test]
    fn test_html5_meta_charset() {
        let bytes = b"<!DOCTYPE html><html><head><meta charset=\"euc-jp\"></head></html>";
        let encoding = detect_encoding(bytes, None, encoding_rs::UTF_8);
        assert_eq!(encoding, encoding_rs::EUC_JP);
    }

    #[test]
    fn test_valid_utf8_without_declaration() {
        let bytes = "<p>銀河鉄道の夜</p>".as_bytes();
        let encoding = detect_encoding(bytes, None, encoding_rs::SHIFT_JIS);
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_undeclared_non_utf8_uses_fallback() {
        let bytes = shift_jis("<p>こころ</p>");
        let (text, encoding) = decode_body(&bytes, None, encoding_rs::SHIFT_JIS);
        assert_eq!(encoding, encoding_rs::SHIFT_JIS);
        assert_eq!(text, "<p>こころ</p>");
    }

    #[test]
    fn test_bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend("人間失格".as_bytes());
        let encoding = detect_encoding(&bytes, Some("text/html; charset=Shift_JIS"), encoding_rs::SHIFT_JIS);
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_fetch_error_url() {
        let err = FetchError::Status {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert_eq!(err.url(), "https://example.com/missing");
        assert_eq!(err.to_string(), "HTTP 404 for https://example.com/missing");
    }
}
