//! Integration tests for LitLite
//!
//! The pipeline tests use wiremock to stand in for the archive and run the
//! full scrape end-to-end against a scratch store.

mod common;
mod pipeline_tests;
mod site_tests;
