//! Output generation for scraped leads.
//!
//! # Submodules
//!
//! - [`table`]: renders leads as an aligned plain-text table for the terminal
//! - [`csv`]: writes the downloadable `Title,Phone,Source` report
//! - [`json`]: writes the whole report, warnings included, as JSON

pub mod csv;
pub mod json;
pub mod table;
