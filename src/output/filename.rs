//! Filesystem-safe page names
//!
//! Work titles become file names. Titles are not unique, so names are
//! assigned in record order and later duplicates get the record id
//! appended.

use crate::storage::WorkRecord;
use std::collections::HashSet;

/// Stems taken by the listing pages
pub const RESERVED_STEMS: [&str; 4] = ["index", "by_author", "by_genre", "by_year"];

/// Stem used when a title sanitizes to nothing
pub const UNTITLED: &str = "untitled";

/// Longest file name, in bytes, common filesystems accept
pub const MAX_NAME_BYTES: usize = 255;

const EXTENSION: &str = ".html";

/// Derives a filesystem-safe stem from a title
///
/// # Rules
///
/// - `\ / : * ? " < > |` and control characters become `_`
/// - `(` and `)` are removed
/// - ASCII and full-width spaces become `_`
/// - runs of `_` collapse to one; leading and trailing `_` are trimmed
/// - the result is cut to `max_len` characters, and further on a char
///   boundary so that the stem plus `.html` fits in [`MAX_NAME_BYTES`]
/// - an empty result becomes `untitled`
///
/// # Example
///
/// ```
/// use litlite::sanitize_filename;
///
/// assert_eq!(sanitize_filename("吾輩は猫である (上)", 100), "吾輩は猫である_上");
/// assert_eq!(sanitize_filename("???", 100), "untitled");
/// ```
pub fn sanitize_filename(title: &str, max_len: usize) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        let mapped = match c {
            '(' | ')' => continue,
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ' ' | '\u{3000}' => '_',
            c if c.is_control() => '_',
            c => c,
        };
        if mapped == '_' && stem.ends_with('_') {
            continue;
        }
        stem.push(mapped);
    }

    let trimmed = clip(
        stem.trim_matches('_'),
        max_len,
        MAX_NAME_BYTES - EXTENSION.len(),
    )
    .trim_end_matches('_');

    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Assigns a unique `.html` file name to every record, in order
///
/// The first record with a given stem keeps it. A stem already taken, by an
/// earlier record or by a listing page, gets `_{id}` appended (and a
/// counter on the rare chance that is taken too). Comparison ignores ASCII
/// case so names stay distinct on case-insensitive filesystems.
pub fn assign_file_names(records: &[WorkRecord], max_len: usize) -> Vec<String> {
    let mut taken: HashSet<String> = RESERVED_STEMS.iter().map(|s| s.to_string()).collect();

    records
        .iter()
        .map(|record| {
            let base = sanitize_filename(&record.title, max_len);

            let mut stem = base.clone();
            let mut attempt = 0;
            while taken.contains(&stem.to_ascii_lowercase()) {
                attempt += 1;
                let suffix = if attempt == 1 {
                    format!("_{}", record.id)
                } else {
                    format!("_{}_{}", record.id, attempt)
                };
                stem = with_suffix(&base, &suffix, max_len);
            }

            if stem != base {
                tracing::debug!(
                    "file name {}.html already taken, using {}.html for work {}",
                    base,
                    stem,
                    record.id
                );
            }

            taken.insert(stem.to_ascii_lowercase());
            format!("{}{}", stem, EXTENSION)
        })
        .collect()
}

/// Appends `suffix`, shortening `base` so the stem stays within `max_len`
/// chars and the file name within [`MAX_NAME_BYTES`]
fn with_suffix(base: &str, suffix: &str, max_len: usize) -> String {
    let head = clip(
        base,
        max_len.saturating_sub(suffix.chars().count()),
        MAX_NAME_BYTES - EXTENSION.len() - suffix.len(),
    )
    .trim_end_matches('_');

    if head.is_empty() {
        suffix.trim_start_matches('_').to_string()
    } else {
        format!("{}{}", head, suffix)
    }
}

/// Longest prefix of `text` with at most `max_chars` chars and `max_bytes` bytes
fn clip(text: &str, max_chars: usize, max_bytes: usize) -> &str {
    let end = text
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take(max_chars)
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &text[..end]
}
