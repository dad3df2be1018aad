//! Scrape module for the archive pipeline
//!
//! This module contains the scraping logic, including:
//! - HTTP fetching with encoding detection
//! - Author and work roster extraction
//! - Full-text link resolution and text extraction
//! - Fixed-delay request pacing
//! - Overall pipeline coordination

mod coordinator;
mod extractor;
mod fetcher;
mod listing;
mod resolver;
mod throttle;

pub use coordinator::{probe_indices, run_scrape, Pipeline, RunReport};
pub use extractor::{clean_text, TextExtractor};
pub use fetcher::{
    build_http_client, decode_body, detect_encoding, FetchError, FetchedPage, PageFetcher,
};
pub use listing::{extract_listing, find_first_link, LinkPredicate, RosterEntry};
pub use resolver::TextResolver;
pub use throttle::Throttle;

use crate::config::Config;
use crate::LitError;

/// Runs a complete scrape
///
/// This is the main entry point for a scrape. It will:
/// 1. Check the store exists
/// 2. Fetch the author roster and select authors with works
/// 3. Fetch, extract and summarize each selected work
/// 4. Commit each author's works to the store
///
/// # Arguments
///
/// * `config` - The pipeline configuration
///
/// # Returns
///
/// * `Ok(RunReport)` - Scrape completed
/// * `Err(LitError)` - Scrape aborted
pub async fn scrape(config: Config) -> Result<RunReport, LitError> {
    run_scrape(config).await
}
