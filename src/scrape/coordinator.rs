//! Scrape pipeline - end-to-end orchestration
//!
//! This module drives one straight-line scrape run:
//! - Fetching the author roster and probing authors for works
//! - Fetching each work's card page and resolving its full-text page
//! - Extracting, checking and summarizing the text
//! - Committing each author's works to the store as one batch
//!
//! Requests are strictly sequential with a fixed delay between them.
//! Per-author and per-work failures are logged and skipped; only the
//! conditions that leave nothing to do abort the run.

use crate::config::Config;
use crate::scrape::extractor::TextExtractor;
use crate::scrape::fetcher::{FetchedPage, PageFetcher};
use crate::scrape::listing::{extract_listing, LinkPredicate, RosterEntry};
use crate::scrape::resolver::TextResolver;
use crate::scrape::throttle::Throttle;
use crate::storage::{NewWork, SqliteStorage, Storage};
use crate::summarize::{ExcerptTruncation, Summarizer};
use crate::url::join_path;
use crate::{ConfigError, LitError};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use url::Url;

/// Outcome counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Entries in the author roster
    pub authors_in_roster: usize,

    /// Authors with at least one work that were processed
    pub authors_selected: usize,

    /// Works committed to the store
    pub works_stored: usize,

    /// Works skipped for any reason (fetch, resolve, extract, store)
    pub works_skipped: usize,
}

/// An author chosen for scraping together with their work roster
#[derive(Debug, Clone)]
struct SelectedAuthor {
    author: RosterEntry,
    works: Vec<RosterEntry>,
}

/// Main scrape pipeline structure
pub struct Pipeline {
    config: Config,
    database_path: PathBuf,
    fetcher: PageFetcher,
    throttle: Throttle,
    author_links: LinkPredicate,
    work_links: LinkPredicate,
    resolver: TextResolver,
    extractor: TextExtractor,
    summarizer: ExcerptTruncation,
}

impl Pipeline {
    /// Creates a pipeline from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(LitError)` - A link pattern, the content selector, or the HTTP
    ///   client could not be built
    pub fn new(config: Config) -> Result<Self, LitError> {
        let scraper = &config.scraper;

        let author_links =
            LinkPredicate::from_config(&scraper.author_link, scraper.author_link_pattern.as_deref())
                .map_err(|e| ConfigError::InvalidPattern(format!("author-link-pattern: {}", e)))?;
        let work_links =
            LinkPredicate::from_config(&scraper.work_link, scraper.work_link_pattern.as_deref())
                .map_err(|e| ConfigError::InvalidPattern(format!("work-link-pattern: {}", e)))?;

        let fetcher = PageFetcher::new(scraper, &config.user_agent)?;
        let throttle = Throttle::new(Duration::from_millis(scraper.request_delay_ms));
        let resolver = TextResolver::new(&scraper.text_link_markers);
        let extractor = TextExtractor::new(&scraper.content_selector)?;
        let summarizer = ExcerptTruncation::new(config.summary.max_chars);
        let database_path = PathBuf::from(&config.output.database_path);

        Ok(Self {
            config,
            database_path,
            fetcher,
            throttle,
            author_links,
            work_links,
            resolver,
            extractor,
            summarizer,
        })
    }

    /// Runs the pipeline once
    ///
    /// This is the core scrape logic that:
    /// 1. Checks the store exists
    /// 2. Fetches the author roster
    /// 3. Probes authors until enough with works are found
    /// 4. Processes the first works of each selected author
    /// 5. Stores each author's works as one batch
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - Run finished; individual items may have been skipped
    /// * `Err(LitError)` - Store missing, roster unavailable or empty, or no
    ///   author had any works
    pub async fn run(&mut self) -> Result<RunReport, LitError> {
        let start_time = Instant::now();

        // Fail before any network traffic if there is nowhere to store results
        SqliteStorage::open(&self.database_path)?;

        let index_url = join_path(
            &self.config.scraper.base_url,
            &self.config.scraper.author_index_path,
        )?;
        tracing::info!("Fetching author roster from {}", index_url);

        let page = self.fetch(&index_url).await?;
        let roster = {
            let document = page.parse();
            extract_listing(&document, &page.url, &self.author_links)
        };

        if roster.is_empty() {
            return Err(LitError::EmptyInput(format!(
                "no author links found at {}",
                index_url
            )));
        }
        tracing::info!("Author roster has {} entries", roster.len());

        let selected = self.select_authors(&roster).await;
        if selected.is_empty() {
            return Err(LitError::EmptyInput(
                "no probed author has any works".to_string(),
            ));
        }

        let mut report = RunReport {
            authors_in_roster: roster.len(),
            authors_selected: selected.len(),
            ..RunReport::default()
        };

        for selected in &selected {
            self.process_author(selected, &mut report).await;
        }

        tracing::info!(
            "Scrape completed: {} works stored, {} skipped from {} authors in {:?}",
            report.works_stored,
            report.works_skipped,
            report.authors_selected,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Waits out the throttle, then fetches
    async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, LitError> {
        self.throttle.wait().await;
        Ok(self.fetcher.fetch(url).await?)
    }

    /// Probes roster entries inside the configured windows
    ///
    /// Authors whose page fails to load, or which lists no works, are
    /// passed over. Probing stops once `max-authors` have been selected.
    async fn select_authors(&mut self, roster: &[RosterEntry]) -> Vec<SelectedAuthor> {
        let max_authors = self.config.scraper.max_authors;
        let indices = probe_indices(&self.config.scraper.probe_windows, roster.len());
        let mut selected = Vec::new();

        for index in indices {
            if selected.len() >= max_authors {
                break;
            }

            let author = &roster[index];
            let page = match self.fetch(&author.url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Skipping author {} ({}): {}", author.label, author.url, e);
                    continue;
                }
            };

            let works = {
                let document = page.parse();
                extract_listing(&document, &page.url, &self.work_links)
            };

            if works.is_empty() {
                tracing::debug!("Author {} lists no works", author.label);
                continue;
            }

            tracing::info!("Selected author {} ({} works)", author.label, works.len());
            selected.push(SelectedAuthor {
                author: author.clone(),
                works,
            });
        }

        selected
    }

    async fn process_author(&mut self, selected: &SelectedAuthor, report: &mut RunReport) {
        let author = &selected.author.label;
        let mut batch = Vec::new();

        for work in selected
            .works
            .iter()
            .take(self.config.scraper.works_per_author)
        {
            match self.process_work(work, author).await {
                Ok(new_work) => {
                    tracing::info!("Summarized {} / {}", author, work.label);
                    batch.push(new_work);
                }
                Err(e) => {
                    tracing::warn!("Skipping work {} ({}): {}", work.label, work.url, e);
                    report.works_skipped += 1;
                }
            }
        }

        if batch.is_empty() {
            return;
        }

        match self.store_batch(&batch) {
            Ok(stored) => report.works_stored += stored,
            Err(e) => {
                tracing::warn!(
                    "Failed to store {} works for {}: {}",
                    batch.len(),
                    author,
                    e
                );
                report.works_skipped += batch.len();
            }
        }
    }

    /// Card page → text page → cleaned text → summary
    async fn process_work(&mut self, work: &RosterEntry, author: &str) -> Result<NewWork, LitError> {
        let card = self.fetch(&work.url).await?;
        let text_url = {
            let document = card.parse();
            self.resolver.resolve(&document, &card.url)
        }
        .ok_or_else(|| LitError::Parse {
            url: card.url.to_string(),
            message: "no full-text link on card page".to_string(),
        })?;

        let text_page = self.fetch(&text_url).await?;
        let text = {
            let document = text_page.parse();
            self.extractor.extract(&document, &text_page.url)?
        };

        let length = text.chars().count();
        let minimum = self.config.scraper.min_text_length;
        if length < minimum {
            return Err(LitError::ExtractionTooShort {
                url: text_page.url.to_string(),
                length,
                minimum,
            });
        }

        Ok(NewWork {
            source_url: Some(work.url.to_string()),
            ..NewWork::new(
                work.label.clone(),
                author,
                self.summarizer.summarize(&text),
            )
        })
    }

    /// Opens a fresh connection and commits the batch
    fn store_batch(&self, batch: &[NewWork]) -> Result<usize, LitError> {
        let mut storage = SqliteStorage::open(&self.database_path)?;
        let ids = storage.insert_works(batch)?;
        Ok(ids.len())
    }
}

/// Expands `[start, end)` windows into roster indices
///
/// Windows are clamped to the roster length; an index covered by more than
/// one window is probed once, at its first position.
pub fn probe_indices(windows: &[[usize; 2]], roster_len: usize) -> Vec<usize> {
    let mut seen = std::collections::HashSet::new();
    windows
        .iter()
        .flat_map(|&[start, end]| start.min(roster_len)..end.min(roster_len))
        .filter(|i| seen.insert(*i))
        .collect()
}

/// Runs one scrape with the given configuration
pub async fn run_scrape(config: Config) -> Result<RunReport, LitError> {
    let mut pipeline = Pipeline::new(config)?;
    pipeline.run().await
}
