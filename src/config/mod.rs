//! Configuration module for LitLite
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every path the pipeline touches lives here; nothing is read from globals.
//!
//! # Example
//!
//! ```no_run
//! use litlite::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("litlite.toml")).unwrap();
//! println!("Store: {}", config.output.database_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ScraperConfig, SiteConfig, SummaryConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
