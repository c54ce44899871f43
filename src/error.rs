//! Error types for fetching, scraping and site configuration.
//!
//! Pipeline failures never abort a run. They are recorded as
//! [`ScrapeError`] values in the report's warning list:
//!
//! | Variant | Effect |
//! |---------|--------|
//! | [`ScrapeError::SearchFetch`] | run ends with no leads |
//! | [`ScrapeError::DetailFetch`] | that lead keeps the "Not Found" phone |

use thiserror::Error;

/// Why a single page request failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport error, timeout, non-2xx status or unreadable body.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The URL could not be parsed or resolved.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The link is blank, fragment-only or leads back to the site root or
    /// the search page.
    #[error("link {0:?} does not point at a detail page")]
    NotADetailPage(String),
}

/// A non-fatal failure recorded during a pipeline run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("error fetching search page {url}: {source}")]
    SearchFetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("error fetching detail page {url}: {source}")]
    DetailFetch {
        url: String,
        #[source]
        source: FetchError,
    },
}

impl ScrapeError {
    pub fn url(&self) -> &str {
        match self {
            ScrapeError::SearchFetch { url, .. } | ScrapeError::DetailFetch { url, .. } => url,
        }
    }
}

/// Invalid site profile, detected at startup before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid base url {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid css selector {selector:?} for {field}: {reason}")]
    Selector {
        field: &'static str,
        selector: String,
        reason: String,
    },
    #[error("search path {0:?} must contain both {{city}} and {{keyword}}")]
    SearchPath(String),
    #[error("timeout must be at least one second")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_display_includes_url() {
        let err = ScrapeError::DetailFetch {
            url: "not a url".to_string(),
            source: FetchError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("error fetching detail page not a url"));
        assert!(msg.contains("invalid url"));
        assert_eq!(err.url(), "not a url");
    }

    #[test]
    fn test_search_path_error_message() {
        let err = ConfigError::SearchPath("/q-{keyword}/".to_string());
        assert_eq!(
            err.to_string(),
            "search path \"/q-{keyword}/\" must contain both {city} and {keyword}"
        );
    }
}
