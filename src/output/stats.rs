//! Statistics generation from the summary store
//!
//! This module provides functionality for extracting and displaying
//! store statistics.

use crate::storage::Storage;
use crate::LitError;
use std::collections::BTreeMap;

/// Store statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteStatistics {
    /// Total number of stored works
    pub total_works: u64,

    /// Number of distinct authors
    pub total_authors: u64,

    /// Number of distinct non-null genres
    pub total_genres: u64,

    /// Number of distinct tags
    pub total_tags: u64,

    /// Works per author
    pub works_by_author: BTreeMap<String, u64>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(SiteStatistics)` - Successfully loaded statistics
/// * `Err(LitError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<SiteStatistics, LitError> {
    let mut works_by_author = BTreeMap::new();
    for work in storage.list_works()? {
        *works_by_author.entry(work.author).or_insert(0) += 1;
    }

    Ok(SiteStatistics {
        total_works: storage.count_works()?,
        total_authors: storage.count_authors()?,
        total_genres: storage.count_genres()?,
        total_tags: storage.count_tags()?,
        works_by_author,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &SiteStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Overview:");
    println!("  Works: {}", stats.total_works);
    println!("  Authors: {}", stats.total_authors);
    println!("  Genres: {}", stats.total_genres);
    println!("  Tags: {}", stats.total_tags);
    println!();

    if !stats.works_by_author.is_empty() {
        println!("Works by Author:");
        // Sort authors by count (descending)
        let mut author_counts: Vec<_> = stats.works_by_author.iter().collect();
        author_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (author, count) in author_counts {
            println!("  {}: {}", author, count);
        }
    }
}
