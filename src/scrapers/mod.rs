//! Listing site scrapers.
//!
//! Each scraper follows the same two-phase pattern:
//!
//! 1. **Indexing**: fetch the search page and read its result items
//! 2. **Fetching**: follow each item to its detail page and extract contact data
//!
//! # Supported Sites
//!
//! | Site | Module | Method | Notes |
//! |------|--------|--------|-------|
//! | OLX India | [`olx`] | HTML scraping | Markup read through [`crate::config::SiteProfile`] |
//!
//! Requests are issued one at a time. Failed fetches are logged, recorded as
//! report warnings and never abort the run.

pub mod olx;
