//! Summary stand-ins
//!
//! There is no language model here. `ExcerptTruncation` keeps the opening
//! of a text, flattened to one line, and is named for exactly that so no
//! caller mistakes it for a real summarizer.

/// Ellipsis appended to truncated excerpts
pub const ELLIPSIS: &str = "...";

/// Turns cleaned text into the summary stored for a work
pub trait Summarizer {
    fn summarize(&self, text: &str) -> String;
}

/// Fixed-budget prefix truncation
///
/// Carriage returns are removed and every newline becomes a single space.
/// If the flattened text is longer than `max_chars` characters, the first
/// `max_chars` are kept and [`ELLIPSIS`] is appended; otherwise the text is
/// returned unchanged. No sentence-boundary awareness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcerptTruncation {
    pub max_chars: usize,
}

impl ExcerptTruncation {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for ExcerptTruncation {
    fn default() -> Self {
        Self::new(500)
    }
}

impl Summarizer for ExcerptTruncation {
    fn summarize(&self, text: &str) -> String {
        let flat = text.replace('\r', "").replace('\n', " ");

        match flat.char_indices().nth(self.max_chars) {
            Some((cut, _)) => format!("{}{}", &flat[..cut], ELLIPSIS),
            None => flat,
        }
    }
}
