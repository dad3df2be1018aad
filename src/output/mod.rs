//! Output module for generating the static summary site
//!
//! This module handles:
//! - Deriving safe, unique page file names from work titles
//! - Rendering detail, index and grouped listing pages from templates
//! - Writing the site to disk
//! - Reporting store statistics

mod filename;
pub mod stats;
mod templates;
mod writer;

pub use filename::{
    assign_file_names, sanitize_filename, MAX_NAME_BYTES, RESERVED_STEMS, UNTITLED,
};
pub use stats::{load_statistics, print_statistics, SiteStatistics};
pub use templates::{
    escape_html, fill, href_for, render, RenderedPage, SiteContext, SiteEntry, Slot, Template,
    UNKNOWN_GENRE, UNKNOWN_YEAR,
};
pub use writer::{generate_site, SiteReport};
