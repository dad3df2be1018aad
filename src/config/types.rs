use serde::Deserialize;

/// Main configuration structure for LitLite
///
/// Every section has documented defaults, so an empty file (or no file at
/// all) yields a working configuration pointed at Aozora Bunko.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub summary: SummaryConfig,
    pub output: OutputConfig,
    pub site: SiteConfig,
}

/// Scrape pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Root of the archive (default: `https://www.aozora.gr.jp/`)
    pub base_url: String,

    /// Author roster page, relative to `base_url`
    pub author_index_path: String,

    /// Substring an author link href must contain (default: `person`)
    pub author_link: String,

    /// Regex an author link href must match; overrides `author_link`
    pub author_link_pattern: Option<String>,

    /// Substring a work link href must contain (default: `cards`)
    pub work_link: String,

    /// Regex a work link href must match; overrides `work_link`
    pub work_link_pattern: Option<String>,

    /// Markers that must all appear in the full-text link href
    pub text_link_markers: Vec<String>,

    /// CSS selector of the main text container on full-text pages
    pub content_selector: String,

    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,

    /// Fixed delay between successive requests in milliseconds (default: 500)
    pub request_delay_ms: u64,

    /// Number of authors with works to select (default: 5)
    pub max_authors: usize,

    /// Number of works taken from each selected author (default: 3)
    pub works_per_author: usize,

    /// Half-open `[start, end)` roster index windows probed for authors
    pub probe_windows: Vec<[usize; 2]>,

    /// Cleaned text shorter than this many chars is skipped (default: 100)
    pub min_text_length: usize,

    /// Encoding used when neither headers nor markup declare one
    pub fallback_encoding: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.aozora.gr.jp/".to_string(),
            author_index_path: "index_pages/person_all.html".to_string(),
            author_link: "person".to_string(),
            author_link_pattern: None,
            work_link: "cards".to_string(),
            work_link_pattern: None,
            text_link_markers: vec!["files/".to_string(), ".html".to_string()],
            content_selector: "div.main_text".to_string(),
            request_timeout_secs: 10,
            request_delay_ms: 500,
            max_authors: 5,
            works_per_author: 3,
            probe_windows: vec![[0, 20], [50, 70], [100, 120], [200, 220]],
            min_text_length: 100,
            fallback_encoding: "Shift_JIS".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    pub agent_name: String,
    pub agent_version: String,
    pub contact_url: String,
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            agent_name: "LitLite".to_string(),
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/litlite".to_string(),
            contact_email: "litlite@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.agent_name, self.agent_version, self.contact_url, self.contact_email
        )
    }
}

/// Excerpt truncation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SummaryConfig {
    /// Character budget of a stored summary (default: 500)
    pub max_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { max_chars: 500 }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite store (default: `summaries.db`)
    pub database_path: String,

    /// Directory the static site is written to (default: `aozora_summaries`)
    pub site_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "summaries.db".to_string(),
            site_dir: "aozora_summaries".to_string(),
        }
    }
}

/// Static site rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Site name shown in headers and page titles
    pub title: String,

    /// Maximum length, in chars, of a sanitized page file stem (default: 100)
    pub filename_max_length: usize,

    /// Length of the excerpt shown on index cards (default: 80)
    pub excerpt_length: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "LitLite -要約文庫-".to_string(),
            filename_max_length: 100,
            excerpt_length: 80,
        }
    }
}
