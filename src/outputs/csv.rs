//! CSV export of scraped leads.
//!
//! The report has a fixed `Title,Phone,Source` header, one row per lead in
//! pipeline order and standard CSV quoting. There is no index column.

use crate::models::Lead;
use crate::utils::ensure_parent_dir;
use csv::WriterBuilder;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const CSV_HEADER: [&str; 3] = ["Title", "Phone", "Source"];

/// Render leads as CSV text, header included.
pub fn leads_to_csv(leads: &[Lead]) -> Result<String, Box<dyn Error>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for lead in leads {
        writer.serialize(lead)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Write leads to a CSV file, creating parent directories as needed.
///
/// # Returns
///
/// The number of data rows written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_leads_csv(leads: &[Lead], path: &Path) -> Result<usize, Box<dyn Error>> {
    let csv = leads_to_csv(leads)?;
    ensure_parent_dir(path).await?;
    fs::write(path, csv).await?;
    info!(rows = leads.len(), "Wrote CSV report");
    Ok(leads.len())
}
