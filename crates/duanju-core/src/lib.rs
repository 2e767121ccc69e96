//! Short-drama search core library
//!
//! Searches a rotating set of mirrored short-drama index sites and pulls
//! Quark cloud-storage share links out of their detail pages.
//!
//! # Overview
//!
//! - [`EndpointStore`] keeps the durable list of search endpoints plus the
//!   seed short links used to rediscover them
//! - [`discover_endpoints`] follows each short link's redirect and appends
//!   newly seen mirrors to the store
//! - [`DuanjuScraper`] probes endpoints for liveness, searches the first live
//!   one and extracts a share link per result
//! - [`ResultCache`] keeps each requester's last results for a numeric
//!   follow-up lookup
//!
//! # Example
//!
//! ```no_run
//! use duanju_core::{DuanjuScraper, EndpointStore, RequesterId, ResultCache, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = DuanjuScraper::new()?;
//!     let mut store = EndpointStore::load(
//!         "search_urls.json",
//!         vec!["https://a80.35240.com/search.php".to_string()],
//!         vec!["A80.CC".to_string()],
//!     );
//!     scraper.refresh_endpoints(&mut store).await;
//!
//!     let outcome = scraper.search("总裁", store.base_urls()).await?;
//!
//!     let mut cache = ResultCache::default();
//!     let me = RequesterId::new("group", "sender");
//!     cache.put(me.clone(), "总裁", outcome.results, outcome.endpoint);
//!
//!     if let Ok(first) = cache.resolve_index(&me, 1) {
//!         println!("{}: {}", first.title, first.pan_link);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
mod client;
pub mod discovery;
mod error;
pub mod parser;
mod scraper;
pub mod store;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, DuanjuClient, PolitenessDelay};

// Re-export error types
pub use error::{DuanjuError, LookupError, Result};

// Re-export parser functions
pub use parser::{parse_pan_link, parse_search_results};

// Re-export main scraper API
pub use scraper::DuanjuScraper;

// Re-export discovery, store and cache
pub use cache::{CacheEntry, DEFAULT_TTL, RequesterId, ResultCache};
pub use discovery::{
    DiscoveryReport, ResolvedLinks, discover_endpoints, merge_endpoints, resolve_short_links,
};
pub use store::{ENDPOINTS_FILE, EndpointStore};

// Re-export data types
pub use types::{Candidate, Outcome, SearchOutcome, SearchResult};
