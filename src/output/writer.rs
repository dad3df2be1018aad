//! Static site writer
//!
//! Reads every work from the store, assigns file names, renders each
//! template and writes the pages into the configured site directory.

use crate::config::Config;
use crate::output::filename::assign_file_names;
use crate::output::templates::{render, RenderedPage, SiteContext, SiteEntry, Template};
use crate::storage::Storage;
use crate::LitError;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a site generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    /// Directory the site was written to
    pub output_dir: PathBuf,

    /// Detail pages written
    pub detail_pages: usize,

    /// Detail pages that could not be written
    pub failed_pages: usize,

    /// Listing pages written (index and group pages)
    pub listing_pages: usize,
}

/// Generates the static site from the store
///
/// # Arguments
///
/// * `storage` - The store to read works from
/// * `config` - Supplies the output directory and site settings
///
/// # Returns
///
/// * `Ok(SiteReport)` - Site written; some detail pages may have failed
/// * `Err(LitError::EmptyInput)` - The store holds no works
/// * `Err(LitError::FileWrite)` - The output directory or a listing page
///   could not be written
pub fn generate_site(storage: &dyn Storage, config: &Config) -> Result<SiteReport, LitError> {
    let works = storage.list_works()?;
    if works.is_empty() {
        return Err(LitError::EmptyInput("the store holds no works".to_string()));
    }

    let output_dir = PathBuf::from(&config.output.site_dir);
    fs::create_dir_all(&output_dir).map_err(|source| LitError::FileWrite {
        path: output_dir.clone(),
        source,
    })?;

    tracing::info!(
        "Generating site for {} works into {}",
        works.len(),
        output_dir.display()
    );

    let file_names = assign_file_names(&works, config.site.filename_max_length);
    let ctx = SiteContext {
        site_title: config.site.title.clone(),
        generated_on: chrono::Utc::now().date_naive(),
        excerpt_length: config.site.excerpt_length,
        entries: works
            .into_iter()
            .zip(file_names)
            .map(|(work, file_name)| SiteEntry { work, file_name })
            .collect(),
    };

    let mut report = SiteReport {
        output_dir: output_dir.clone(),
        ..SiteReport::default()
    };

    for page in render(Template::WorkDetail, &ctx) {
        match write_page(&output_dir, &page) {
            Ok(()) => {
                tracing::debug!("Wrote {}", page.file_name);
                report.detail_pages += 1;
            }
            Err(e) => {
                tracing::warn!("Skipping detail page: {}", e);
                report.failed_pages += 1;
            }
        }
    }

    for template in Template::LISTINGS {
        for page in render(template, &ctx) {
            write_page(&output_dir, &page)?;
            tracing::debug!("Wrote {}", page.file_name);
            report.listing_pages += 1;
        }
    }

    tracing::info!(
        "Site generated: {} detail pages ({} failed), {} listing pages",
        report.detail_pages,
        report.failed_pages,
        report.listing_pages
    );

    Ok(report)
}

fn write_page(dir: &Path, page: &RenderedPage) -> Result<(), LitError> {
    let path = dir.join(&page.file_name);
    fs::write(&path, &page.html).map_err(|source| LitError::FileWrite { path, source })
}
