//! # olx_leads
//!
//! Collects classified-ad leads: searches a listing site for a keyword in a
//! city, follows every result to its detail page and extracts a contact
//! phone number from the page text.
//!
//! ## Usage
//!
//! ```sh
//! olx_leads -k "royal enfield" -c mumbai -n 10 -o olx_leads.csv
//! ```
//!
//! ## Architecture
//!
//! The application is a linear pipeline:
//! 1. **Indexing**: fetch the search page and read up to `max_results` items
//! 2. **Fetching**: visit each item's detail page, one request at a time
//! 3. **Extraction**: normalize the first Indian mobile number in the page text
//! 4. **Output**: print a table, write the CSV (and optionally JSON) report
//!
//! Fetch failures never stop a run; they are returned as warnings and
//! printed after the results.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod phone;
mod scrapers;
mod utils;

use cli::Cli;
use config::SiteConfig;
use models::{ReportDocument, ScrapeReport, SearchQuery};
use outputs::{json, table};
use scrapers::olx::ListingScraper;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("olx_leads starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Site profile ----
    let site_config = match &args.config {
        Some(path) => SiteConfig::load(path).await?,
        None => SiteConfig::default(),
    };
    let profile = match site_config.compile() {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "Invalid site profile");
            return Err(e.into());
        }
    };

    // ---- Scrape ----
    let query = args.query();
    let scraper = ListingScraper::new(profile)?;
    let report = scraper.scrape(&query).await;

    for warning in &report.warnings {
        warn!(url = %warning.url(), "Reported warning");
        eprintln!("warning: {warning}");
    }

    export_report(&args, &query, &report).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        leads = report.leads.len(),
        with_phone = report.with_phone_count(),
        warnings = report.warnings.len(),
        "Execution complete"
    );

    Ok(())
}

/// Print the table and write the CSV and optional JSON reports.
///
/// A failure to write either file is returned to the caller.
async fn export_report(
    args: &Cli,
    query: &SearchQuery,
    report: &ScrapeReport,
) -> Result<(), Box<dyn Error>> {
    if report.leads.is_empty() {
        println!("No leads found.");
    } else {
        if !args.no_table {
            print!("{}", table::render_table(&report.leads));
        }

        match outputs::csv::write_leads_csv(&report.leads, &args.output).await {
            Ok(rows) => println!("Saved {rows} leads to {}", args.output.display()),
            Err(e) => {
                error!(path = %args.output.display(), error = %e, "Failed writing CSV");
                return Err(e);
            }
        }
    }

    if let Some(path) = &args.json_output {
        if let Err(e) = json::write_report(&ReportDocument::new(report, query), path).await {
            error!(path = %path.display(), error = %e, "Failed to write JSON report");
            return Err(e);
        }
    }

    Ok(())
}
