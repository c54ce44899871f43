//! Data models for scraped leads and the report a pipeline run produces.
//!
//! - [`Lead`]: one listing with its title, phone and source URL
//! - [`SearchQuery`]: the caller-supplied inputs of a run
//! - [`ScrapeReport`]: the leads of a run plus every non-fatal warning
//!
//! Missing values are represented by the sentinel strings [`NOT_FOUND`],
//! [`NO_TITLE`] and [`NO_SOURCE`] so that every exported row is complete.

use crate::error::ScrapeError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Phone placeholder when no number could be extracted.
pub const NOT_FOUND: &str = "Not Found";
/// Title placeholder when a result item has no text-bearing title element.
pub const NO_TITLE: &str = "No Title";
/// Source placeholder when a result item has no link.
pub const NO_SOURCE: &str = "N/A";

/// A single extracted listing record.
///
/// Field names serialize capitalized so CSV and JSON share the
/// `Title,Phone,Source` column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lead {
    /// Listing title as shown on the search page.
    pub title: String,
    /// Normalized 10-digit mobile number, or [`NOT_FOUND`].
    pub phone: String,
    /// Absolute detail page URL, or [`NO_SOURCE`].
    pub source: String,
}

impl Lead {
    /// A lead whose phone has not been found (yet).
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            phone: NOT_FOUND.to_string(),
            source: source.into(),
        }
    }

    pub fn has_phone(&self) -> bool {
        self.phone != NOT_FOUND
    }
}

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text search keyword.
    pub keyword: String,
    /// City slug used in the search URL.
    pub city: String,
    /// Upper bound on the number of leads returned.
    pub max_results: usize,
}

/// The outcome of a pipeline run.
///
/// A run never fails as a whole: fetch failures are collected in
/// `warnings` and the caller decides how to surface them.
#[derive(Debug)]
pub struct ScrapeReport {
    /// The search page URL that was requested.
    pub search_url: String,
    /// Leads in search-result order.
    pub leads: Vec<Lead>,
    /// Non-fatal failures encountered along the way.
    pub warnings: Vec<ScrapeError>,
}

impl ScrapeReport {
    pub fn empty(search_url: impl Into<String>) -> Self {
        Self {
            search_url: search_url.into(),
            leads: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Number of leads that carry a real phone number.
    pub fn with_phone_count(&self) -> usize {
        self.leads.iter().filter(|l| l.has_phone()).count()
    }
}

/// Serializable snapshot of a [`ScrapeReport`] for the JSON export.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub search_url: &'a str,
    pub keyword: &'a str,
    pub city: &'a str,
    pub leads: &'a [Lead],
    pub warnings: Vec<String>,
}

impl<'a> ReportDocument<'a> {
    pub fn new(report: &'a ScrapeReport, query: &'a SearchQuery) -> Self {
        Self {
            generated_at: Utc::now(),
            search_url: &report.search_url,
            keyword: &query.keyword,
            city: &query.city,
            leads: &report.leads,
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}
