//! Site profile: where to search and how to read the result markup.
//!
//! Listing sites change their class names often, so every URL and CSS
//! selector the pipeline relies on lives in [`SiteConfig`]. The built-in
//! defaults target OLX India; a YAML file can override any subset of fields:
//!
//! ```yaml
//! base_url: https://www.olx.in
//! search_path: /{city}/q-{keyword}/
//! timeout_secs: 10
//! selectors:
//!   item: li.EIR5N
//!   title: span
//!   link: a[href]
//! ```
//!
//! [`SiteConfig::compile`] validates the profile once at startup and
//! produces a [`SiteProfile`] with parsed URLs and selectors.

use crate::error::{ConfigError, FetchError};
use itertools::Itertools;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.olx.in";
pub const DEFAULT_SEARCH_PATH: &str = "/{city}/q-{keyword}/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CITY: &str = "mumbai";

/// CSS selectors used to read the search results page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Selectors {
    /// One element per search result.
    pub item: String,
    /// Title element inside a result; the first one with text wins.
    pub title: String,
    /// Link element inside a result; its `href` points at the detail page.
    pub link: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            item: "li.EIR5N".to_string(),
            title: "span".to_string(),
            link: "a[href]".to_string(),
        }
    }
}

/// Raw, user-editable site profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the listing site; relative links resolve against it.
    pub base_url: String,
    /// Search path template with `{city}` and `{keyword}` placeholders.
    pub search_path: String,
    /// Static `User-Agent` sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub selectors: Selectors,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            selectors: Selectors::default(),
        }
    }
}

impl SiteConfig {
    /// Read a YAML profile from disk. Missing fields take their defaults.
    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).await.map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        info!(base_url = %config.base_url, "Loaded site profile");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Validate the profile and parse its URL and selectors.
    pub fn compile(self) -> Result<SiteProfile, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if !self.search_path.contains("{city}") || !self.search_path.contains("{keyword}") {
            return Err(ConfigError::SearchPath(self.search_path.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Timeout);
        }

        let item = parse_selector("item", &self.selectors.item)?;
        let title = parse_selector("title", &self.selectors.title)?;
        let link = parse_selector("link", &self.selectors.link)?;

        Ok(SiteProfile {
            base_url,
            item,
            title,
            link,
            config: self,
        })
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// A validated [`SiteConfig`], ready for the pipeline.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub config: SiteConfig,
    pub base_url: Url,
    pub item: Selector,
    pub title: Selector,
    pub link: Selector,
}

impl SiteProfile {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    /// Build the search page URL for a keyword and city.
    ///
    /// Whitespace runs become hyphens and each value is percent-encoded as a
    /// single path segment.
    pub fn search_url(&self, keyword: &str, city: &str) -> Result<Url, url::ParseError> {
        let path = self
            .config
            .search_path
            .replace("{city}", &urlencoding::encode(&to_slug(city)))
            .replace("{keyword}", &urlencoding::encode(&to_slug(keyword)));
        self.base_url.join(&path)
    }

    /// Resolve a (possibly relative) result link to its detail page URL.
    ///
    /// Blank and fragment-only hrefs are rejected, as are links that resolve
    /// (fragment aside) to the site root or to `search_url`.
    pub fn resolve_detail_link(&self, href: &str, search_url: &Url) -> Result<Url, FetchError> {
        let trimmed = href.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Err(FetchError::NotADetailPage(href.to_string()));
        }

        let url = self.base_url.join(trimmed)?;
        let mut bare = url.clone();
        bare.set_fragment(None);
        let mut search = search_url.clone();
        search.set_fragment(None);
        if bare == self.base_url || bare == search {
            return Err(FetchError::NotADetailPage(href.to_string()));
        }
        Ok(url)
    }
}

/// Join whitespace-separated words with hyphens: `"red  sofa "` → `"red-sofa"`.
pub fn to_slug(value: &str) -> String {
    value.split_whitespace().join("-")
}
