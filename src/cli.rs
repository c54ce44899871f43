//! Command-line interface definitions for olx_leads.
//!
//! The CLI is the presentation layer: it owns every user input and hands
//! them to the pipeline as an explicit [`SearchQuery`].

use crate::config::DEFAULT_CITY;
use crate::models::SearchQuery;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for olx_leads.
///
/// # Examples
///
/// ```sh
/// # Ten listings for "royal enfield" in Mumbai, written to olx_leads.csv
/// olx_leads -k "royal enfield"
///
/// # Twenty listings in Pune, also exporting JSON
/// olx_leads -k sofa -c pune -n 20 -o out/sofa.csv --json-output out/sofa.json
///
/// # Custom site profile
/// olx_leads -k sofa --config site.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search keyword
    #[arg(short, long, value_parser = parse_keyword)]
    pub keyword: String,

    /// City to search in
    #[arg(short, long, default_value = DEFAULT_CITY)]
    pub city: String,

    /// Maximum number of listings to collect (1-50)
    #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub max_results: u32,

    /// Path of the CSV report
    #[arg(short, long, default_value = "olx_leads.csv")]
    pub output: PathBuf,

    /// Optional path of a JSON report including warnings
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Optional path to a YAML site profile
    #[arg(long, env = "OLX_LEADS_CONFIG")]
    pub config: Option<String>,

    /// Skip printing the results table
    #[arg(long)]
    pub no_table: bool,
}

impl Cli {
    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            keyword: self.keyword.trim().to_string(),
            city: self.city.trim().to_string(),
            max_results: self.max_results as usize,
        }
    }
}

fn parse_keyword(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("please enter a keyword".to_string())
    } else {
        Ok(value.to_string())
    }
}
