//! Main scraper API for short-drama mirror sites
//!
//! Combines the HTTP client with the HTML parsers: liveness probing,
//! keyword search across the endpoint list, and share-link extraction
//! from detail pages.

use tracing::{debug, info, warn};

use crate::client::{ClientConfig, DuanjuClient};
use crate::discovery::{DiscoveryReport, discover_endpoints};
use crate::error::{DuanjuError, Result};
use crate::parser::{parse_pan_link, parse_search_results};
use crate::store::EndpointStore;
use crate::types::{Outcome, SearchOutcome, SearchResult};
use crate::url::build_search_url;

/// Main scraper API
///
/// All requests are sequential: endpoints are tried one after another in
/// stored order, and detail pages are fetched one at a time, each behind
/// its own politeness delay.
pub struct DuanjuScraper {
    client: DuanjuClient,
}

impl DuanjuScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        let client = DuanjuClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = DuanjuClient::with_config(config)?;
        Ok(Self { client })
    }

    /// Search the first live endpoint that yields results
    ///
    /// Endpoints are tried in the given order. Dead endpoints, failed
    /// searches and pages without usable results are logged and skipped.
    /// The first endpoint producing at least one result wins; later
    /// endpoints are not contacted.
    ///
    /// # Returns
    /// A [`SearchOutcome`] naming the endpoint used. Empty results with no
    /// endpoint is the normal "nothing found" answer.
    ///
    /// # Errors
    /// - `InvalidQuery` if the keyword is empty or whitespace only
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> duanju_core::Result<()> {
    /// use duanju_core::DuanjuScraper;
    /// let scraper = DuanjuScraper::new()?;
    /// let endpoints = vec!["https://a80.35240.com/search.php".to_string()];
    /// let outcome = scraper.search("总裁", &endpoints).await?;
    /// for result in &outcome.results {
    ///     println!("{}: {}", result.title, result.pan_link);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, keyword: &str, endpoints: &[String]) -> Result<SearchOutcome> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(DuanjuError::InvalidQuery(
                "Search keyword cannot be empty".to_string(),
            ));
        }

        info!(keyword, "searching");
        for endpoint in endpoints {
            if !self.is_alive(endpoint).await {
                continue;
            }
            info!(endpoint = %endpoint, "using live endpoint");

            match self.search_endpoint(endpoint, keyword).await {
                Outcome::Found(results) => {
                    info!(endpoint = %endpoint, count = results.len(), "search finished");
                    return Ok(SearchOutcome {
                        results,
                        endpoint: Some(endpoint.clone()),
                    });
                }
                Outcome::Empty => {
                    info!(endpoint = %endpoint, "no usable results, trying next endpoint");
                }
                Outcome::Failed(e) => {
                    warn!(endpoint = %endpoint, error = %e, "search failed, trying next endpoint");
                }
            }
        }

        warn!(keyword, "no endpoint returned results");
        Ok(SearchOutcome::default())
    }

    /// Search a single endpoint and resolve every candidate's share link
    ///
    /// Candidates whose detail page yields no link are dropped.
    pub async fn search_endpoint(&self, endpoint: &str, keyword: &str) -> Outcome<Vec<SearchResult>> {
        let url = build_search_url(endpoint, keyword);
        let html = match self.client.fetch_page(&url).await {
            Ok(html) => html,
            Err(e) => return Outcome::Failed(e),
        };

        let candidates = match parse_search_results(&html) {
            Ok(candidates) => candidates,
            Err(e) => return Outcome::Failed(e),
        };
        debug!(endpoint, count = candidates.len(), "detail candidates found");

        let mut results = Vec::new();
        for candidate in candidates {
            match self.extract_pan_link(&candidate.href).await {
                Outcome::Found(pan_link) => results.push(SearchResult {
                    title: candidate.title,
                    pan_link,
                }),
                Outcome::Empty => debug!(url = %candidate.href, "no share link on detail page"),
                Outcome::Failed(e) => {
                    warn!(url = %candidate.href, error = %e, "detail page fetch failed")
                }
            }
        }

        if results.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Found(results)
        }
    }

    /// Fetch a detail page and extract its Quark share link
    pub async fn extract_pan_link(&self, url: &str) -> Outcome<String> {
        match self.client.fetch_page(url).await {
            Ok(html) => match parse_pan_link(&html) {
                Some(link) => Outcome::Found(link),
                None => Outcome::Empty,
            },
            Err(e) => Outcome::Failed(e),
        }
    }

    /// Probe an endpoint; any failure counts as dead
    pub async fn is_alive(&self, endpoint: &str) -> bool {
        match self.client.probe(endpoint).await {
            Ok(()) => true,
            Err(e) => {
                debug!(endpoint, error = %e, "endpoint is dead");
                false
            }
        }
    }

    /// Rediscover endpoints from the store's short links
    pub async fn refresh_endpoints(&self, store: &mut EndpointStore) -> DiscoveryReport {
        discover_endpoints(&self.client, store).await
    }

    pub fn client(&self) -> &DuanjuClient {
        &self.client
    }
}
