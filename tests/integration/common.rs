//! Shared fixtures for the integration tests

use litlite::config::Config;
use litlite::storage::SqliteStorage;
use std::path::Path;
use tempfile::TempDir;

/// A sentence long enough that five of them pass the minimum text length
pub const MELOS: &str = "メロスは激怒した。必ず、かの邪智暴虐の王を除かなければならぬと決意した。";

/// Creates a configuration pointed at a mock server and a scratch directory
pub fn test_config(base_url: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.scraper.base_url = format!("{}/", base_url.trim_end_matches('/'));
    config.scraper.request_delay_ms = 0;
    config.scraper.request_timeout_secs = 5;
    config.user_agent.agent_name = "TestBot".to_string();
    config.user_agent.contact_url = "https://example.com/contact".to_string();
    config.user_agent.contact_email = "test@example.com".to_string();
    config.output.database_path = dir.join("summaries.db").to_string_lossy().into_owned();
    config.output.site_dir = dir.join("site").to_string_lossy().into_owned();
    config
}

/// Creates an empty store at the configured path
pub fn create_store(config: &Config) -> SqliteStorage {
    SqliteStorage::create(Path::new(&config.output.database_path)).expect("Failed to create store")
}

/// Scratch directory for one test
pub fn scratch() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Wraps body markup in a minimal UTF-8 page
pub fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="UTF-8"><title>test</title></head><body>{}</body></html>"#,
        body
    )
}

/// A full-text page with the given main text
pub fn text_page(main_text: &str) -> String {
    page(&format!(r#"<div class="main_text">{}</div>"#, main_text))
}

/// A card page linking to a full-text page and a zip archive
pub fn card_page(text_href: &str) -> String {
    page(&format!(
        r#"<table><tr><td><a href="./files/ruby.zip">ruby.zip</a></td></tr>
           <tr><td><a href="{}">XHTML版で読む</a></td></tr></table>"#,
        text_href
    ))
}
