//! OLX listing scraper.
//!
//! Searches [OLX India](https://www.olx.in) for a keyword in a city, reads the
//! result items from the search page and visits each item's detail page to
//! find a contact number in its visible text.
//!
//! # URL Pattern
//!
//! Search pages live at `https://www.olx.in/{city}/q-{keyword}/`; result items
//! link to detail pages with relative URLs that are resolved against the
//! site base URL.

use crate::config::SiteProfile;
use crate::error::{FetchError, ScrapeError};
use crate::models::{Lead, NO_SOURCE, NO_TITLE, ScrapeReport, SearchQuery};
use crate::phone::extract_phone_numbers;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Elements whose text never reaches the reader.
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// A search result before its detail page has been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub title: String,
    pub href: Option<String>,
}

/// Sequential search-and-detail scraper bound to one site profile.
#[derive(Debug)]
pub struct ListingScraper {
    client: Client,
    profile: SiteProfile,
}

impl ListingScraper {
    /// Build a scraper whose HTTP client carries the profile's timeout and
    /// `User-Agent` on every request.
    pub fn new(profile: SiteProfile) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(profile.timeout())
            .user_agent(profile.user_agent())
            .build()?;
        Ok(Self { client, profile })
    }

    /// Run the pipeline for one query.
    ///
    /// Never fails: a search page failure yields an empty report with one
    /// warning, a detail page failure leaves that lead's phone as
    /// [`NOT_FOUND`](crate::models::NOT_FOUND).
    #[instrument(level = "info", skip_all, fields(keyword = %query.keyword, city = %query.city, max = query.max_results))]
    pub async fn scrape(&self, query: &SearchQuery) -> ScrapeReport {
        let search_url = match self.profile.search_url(&query.keyword, &query.city) {
            Ok(url) => url,
            Err(e) => {
                let url = format!("{}{}", self.profile.config.base_url, self.profile.config.search_path);
                let warning = ScrapeError::SearchFetch {
                    url: url.clone(),
                    source: FetchError::InvalidUrl(e),
                };
                error!(error = %warning, "Could not build search URL");
                let mut report = ScrapeReport::empty(url);
                report.warnings.push(warning);
                return report;
            }
        };

        let mut report = ScrapeReport::empty(search_url.as_str());
        let items = match self.index_listings(&search_url, query.max_results).await {
            Ok(items) => items,
            Err(source) => {
                let warning = ScrapeError::SearchFetch {
                    url: search_url.to_string(),
                    source,
                };
                error!(error = %warning, "Search page fetch failed");
                report.warnings.push(warning);
                return report;
            }
        };

        for item in items {
            let (lead, warning) = self.build_lead(item, &search_url).await;
            report.leads.push(lead);
            report.warnings.extend(warning);
        }

        info!(
            leads = report.leads.len(),
            with_phone = report.with_phone_count(),
            warnings = report.warnings.len(),
            "Scrape finished"
        );
        report
    }

    /// Fetch the search page and read at most `max_results` items from it.
    #[instrument(level = "info", skip_all, fields(url = %search_url, max_results = max_results))]
    pub async fn index_listings(
        &self,
        search_url: &Url,
        max_results: usize,
    ) -> Result<Vec<ListingItem>, FetchError> {
        let html = self.fetch_page(search_url).await?;
        let items = parse_listings(&html, &self.profile, max_results);
        info!(count = items.len(), "Indexed listing items");
        debug!(items = ?items, "Listing items");
        Ok(items)
    }

    /// Turn one search result into a lead, visiting its detail page if it
    /// has a link.
    #[instrument(level = "info", skip_all, fields(title = %item.title))]
    async fn build_lead(&self, item: ListingItem, search_url: &Url) -> (Lead, Option<ScrapeError>) {
        let Some(href) = item.href else {
            debug!("Listing has no link");
            return (Lead::new(item.title, NO_SOURCE), None);
        };

        let detail_url = match self.profile.resolve_detail_link(&href, search_url) {
            Ok(url) => url,
            Err(source) => {
                let warning = ScrapeError::DetailFetch {
                    url: href.clone(),
                    source,
                };
                warn!(error = %warning, "Unresolvable listing link");
                return (Lead::new(item.title, href), Some(warning));
            }
        };

        let mut lead = Lead::new(item.title, detail_url.as_str());
        match self.fetch_detail_phone(&detail_url).await {
            Ok(Some(phone)) => {
                lead.phone = phone;
                (lead, None)
            }
            Ok(None) => (lead, None),
            Err(source) => {
                let warning = ScrapeError::DetailFetch {
                    url: detail_url.to_string(),
                    source,
                };
                warn!(error = %warning, "Detail page fetch failed");
                (lead, Some(warning))
            }
        }
    }

    /// Fetch a detail page and return the first phone number in its text.
    #[instrument(level = "info", skip_all, fields(url = %url))]
    pub async fn fetch_detail_phone(&self, url: &Url) -> Result<Option<String>, FetchError> {
        let html = self.fetch_page(url).await?;
        let text = page_text(&html);
        debug!(preview = %truncate_for_log(&text, 200), "Detail page text");

        let phone = extract_phone_numbers(&text).into_iter().next();
        match &phone {
            Some(p) => info!(phone = %p, "Found phone number"),
            None => info!("No phone number on detail page"),
        }
        Ok(phone)
    }

    /// GET a page, treating any non-2xx status as an error.
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let body = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Read up to `max_results` result items from a search page.
pub fn parse_listings(html: &str, profile: &SiteProfile, max_results: usize) -> Vec<ListingItem> {
    let document = Html::parse_document(html);
    document
        .select(&profile.item)
        .take(max_results)
        .map(|item| ListingItem {
            title: item_title(&item, &profile.title),
            href: item
                .select(&profile.link)
                .find_map(|a| a.value().attr("href"))
                .map(str::to_string),
        })
        .collect()
}

/// Trimmed text of the first title element that has any.
fn item_title(item: &ElementRef<'_>, selector: &Selector) -> String {
    item.select(selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Visible text of a page: trimmed text nodes outside script-like elements,
/// joined with single spaces.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
            })
        })
        .filter_map(|node| node.value().as_text().map(|t| t.trim()))
        .filter(|t| !t.is_empty())
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::models::NOT_FOUND;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PAGE: &str = r#"
        <html><body><ul>
          <li class="EIR5N"><a href="/item/royal-enfield-iid-1"><span>Royal Enfield Classic 350</span></a></li>
          <li class="EIR5N"><a href="/item/activa-iid-2"><span></span><span> Honda  Activa 6G </span></a></li>
          <li class="EIR5N"><a href="/item/pulsar-iid-3"><span>Bajaj Pulsar</span></a></li>
          <li class="EIR5N"><div>no link here</div></li>
          <li class="other"><a href="/ad/banner"><span>Sponsored</span></a></li>
        </ul></body></html>
    "#;

    fn detail_page(body: &str) -> String {
        format!("<html><head><script>var tel = '9000000000';</script></head><body><h1>Ad</h1><p>{body}</p></body></html>")
    }

    fn profile_for(base_url: &str) -> SiteProfile {
        SiteConfig {
            base_url: base_url.to_string(),
            timeout_secs: 1,
            ..SiteConfig::default()
        }
        .compile()
        .unwrap()
    }

    fn query(max_results: usize) -> SearchQuery {
        SearchQuery {
            keyword: "bike".to_string(),
            city: "mumbai".to_string(),
            max_results,
        }
    }

    async fn mount_search(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/mumbai/q-bike/"))
            .and(header("user-agent", "Mozilla/5.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
            .mount(server)
            .await;
    }

    async fn mount_detail(server: &MockServer, detail_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(detail_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(body)))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_listings_reads_titles_and_links() {
        let profile = SiteConfig::default().compile().unwrap();
        let items = parse_listings(SEARCH_PAGE, &profile, 10);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].title, "Royal Enfield Classic 350");
        assert_eq!(items[0].href.as_deref(), Some("/item/royal-enfield-iid-1"));
        assert_eq!(items[1].title, "Honda  Activa 6G");
        assert_eq!(items[3].title, NO_TITLE);
        assert_eq!(items[3].href, None);
    }

    #[test]
    fn test_parse_listings_truncates() {
        let profile = SiteConfig::default().compile().unwrap();
        assert_eq!(parse_listings(SEARCH_PAGE, &profile, 2).len(), 2);
        assert!(parse_listings("<html></html>", &profile, 5).is_empty());
    }

    #[test]
    fn test_parse_listings_with_custom_selectors() {
        let mut config = SiteConfig::default();
        config.selectors.item = "div.card".to_string();
        config.selectors.title = "h2".to_string();
        let profile = config.compile().unwrap();
        let html = r#"<div class="card"><h2>Sofa</h2><a href="https://x.test/1">go</a></div>"#;
        let items = parse_listings(html, &profile, 5);
        assert_eq!(
            items,
            vec![ListingItem {
                title: "Sofa".to_string(),
                href: Some("https://x.test/1".to_string()),
            }]
        );
    }

    #[test]
    fn test_page_text_skips_scripts() {
        let text = page_text(&detail_page("Call   me on <b>+91 9876543210</b>"));
        assert_eq!(text, "Ad Call   me on +91 9876543210");
        assert!(!text.contains("9000000000"));
    }

    #[tokio::test]
    async fn test_scrape_returns_exactly_max_results() {
        let server = MockServer::start().await;
        mount_search(&server).await;
        mount_detail(&server, "/item/royal-enfield-iid-1", "Contact: +91-9876543210").await;
        mount_detail(&server, "/item/activa-iid-2", "call 07012345678 after 6pm").await;

        let scraper = ListingScraper::new(profile_for(&server.uri())).unwrap();
        let report = scraper.scrape(&query(2)).await;

        assert_eq!(report.leads.len(), 2);
        assert!(report.warnings.is_empty());
        assert_eq!(report.leads[0].title, "Royal Enfield Classic 350");
        assert_eq!(report.leads[0].phone, "9876543210");
        assert_eq!(
            report.leads[0].source,
            format!("{}/item/royal-enfield-iid-1", server.uri())
        );
        assert_eq!(report.leads[1].phone, "7012345678");
        assert_eq!(report.search_url, format!("{}/mumbai/q-bike/", server.uri()));
    }

    #[tokio::test]
    async fn test_scrape_keeps_lead_when_detail_fetch_fails() {
        let server = MockServer::start().await;
        mount_search(&server).await;
        mount_detail(&server, "/item/royal-enfield-iid-1", "nothing to see").await;
        Mock::given(method("GET"))
            .and(path("/item/activa-iid-2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_detail(&server, "/item/pulsar-iid-3", "ph 8888877777").await;

        let scraper = ListingScraper::new(profile_for(&server.uri())).unwrap();
        let report = scraper.scrape(&query(10)).await;

        assert_eq!(report.leads.len(), 4);
        assert_eq!(report.leads[0].phone, NOT_FOUND);

        let failed = &report.leads[1];
        assert_eq!(failed.title, "Honda  Activa 6G");
        assert_eq!(failed.phone, NOT_FOUND);
        assert_eq!(failed.source, format!("{}/item/activa-iid-2", server.uri()));

        assert_eq!(report.leads[2].phone, "8888877777");
        assert_eq!(report.leads[3].source, NO_SOURCE);

        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(report.warnings[0], ScrapeError::DetailFetch { .. }));
        assert_eq!(report.warnings[0].url(), failed.source);
    }

    #[tokio::test]
    async fn test_blank_and_fragment_links_do_not_fetch_homepage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mumbai/q-bike/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r##"<ul>
                  <li class="EIR5N"><a href=""><span>Bike</span></a></li>
                  <li class="EIR5N"><a href="#"><span>Car</span></a></li>
                </ul>"##,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("Customer care 9123456789")))
            .expect(0)
            .mount(&server)
            .await;

        let scraper = ListingScraper::new(profile_for(&server.uri())).unwrap();
        let report = scraper.scrape(&query(5)).await;

        assert_eq!(report.leads.len(), 2);
        assert_eq!(report.leads[0].title, "Bike");
        assert_eq!(report.leads[0].source, "");
        assert_eq!(report.leads[1].title, "Car");
        assert_eq!(report.leads[1].source, "#");
        assert!(report.leads.iter().all(|l| l.phone == NOT_FOUND));

        assert_eq!(report.warnings.len(), 2);
        for warning in &report.warnings {
            assert!(matches!(
                warning,
                ScrapeError::DetailFetch {
                    source: FetchError::NotADetailPage(_),
                    ..
                }
            ));
        }
    }

    #[tokio::test]
    async fn test_scrape_search_page_error_returns_empty() {
        // No mocks mounted: every request is answered with 404.
        let server = MockServer::start().await;

        let scraper = ListingScraper::new(profile_for(&server.uri())).unwrap();
        let report = scraper.scrape(&query(5)).await;

        assert!(report.leads.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(report.warnings[0], ScrapeError::SearchFetch { .. }));
    }

    #[tokio::test]
    async fn test_scrape_unreachable_host_returns_empty() {
        let scraper = ListingScraper::new(profile_for("http://127.0.0.1:9")).unwrap();
        let report = scraper.scrape(&query(5)).await;

        assert!(report.leads.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            report.warnings[0],
            ScrapeError::SearchFetch {
                source: FetchError::Http(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_detail_timeout_is_reported() {
        let server = MockServer::start().await;
        mount_search(&server).await;
        Mock::given(method("GET"))
            .and(path("/item/royal-enfield-iid-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(detail_page("9876543210"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let scraper = ListingScraper::new(profile_for(&server.uri())).unwrap();
        let report = scraper.scrape(&query(1)).await;

        assert_eq!(report.leads.len(), 1);
        assert_eq!(report.leads[0].phone, NOT_FOUND);
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_detail_phone_takes_first_match() {
        let server = MockServer::start().await;
        mount_detail(&server, "/item/x", "7012345678 or 9876543210").await;

        let scraper = ListingScraper::new(profile_for(&server.uri())).unwrap();
        let url = Url::parse(&format!("{}/item/x", server.uri())).unwrap();
        let phone = scraper.fetch_detail_phone(&url).await.unwrap();
        assert_eq!(phone.as_deref(), Some("7012345678"));
    }
}
