//! JSON export of a full scrape report.
//!
//! Unlike the CSV, the JSON document keeps the query, the generation time
//! and the warning messages alongside the leads:
//!
//! ```text
//! {
//!   "generated_at": "2026-10-19T08:15:02Z",
//!   "search_url": "https://www.olx.in/mumbai/q-bike/",
//!   "keyword": "bike",
//!   "city": "mumbai",
//!   "leads": [{ "Title": "...", "Phone": "...", "Source": "..." }],
//!   "warnings": []
//! }
//! ```

use crate::models::ReportDocument;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`ReportDocument`] as pretty-printed JSON.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(document: &ReportDocument<'_>, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(document)?;

    if let Err(e) = ensure_parent_dir(path).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e);
    }

    fs::write(path, json).await?;
    info!(leads = document.leads.len(), "Wrote JSON report");
    Ok(())
}
