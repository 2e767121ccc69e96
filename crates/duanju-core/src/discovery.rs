//! Endpoint discovery from seed short links
//!
//! Mirror domains rotate; the short links stay put. Following each short
//! link's redirect reveals the current mirror, which is normalized to its
//! search script and appended to the store when it is new.

use tracing::{error, info};

use crate::client::DuanjuClient;
use crate::store::EndpointStore;
use crate::url::{endpoint_key, normalize_endpoint};

/// Summary of one discovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Short links that resolved to some URL
    pub resolved: usize,
    /// Short links that exhausted their retries
    pub failed: usize,
    /// Endpoints appended to the store, in discovery order
    pub added: Vec<String>,
}

/// Filter resolved URLs down to endpoints the store does not know yet
///
/// Each URL is normalized to end in `search.php`. A URL counts as new
/// when its slash-stripped form matches neither a stored endpoint nor an
/// earlier URL from the same batch.
pub fn select_new_endpoints<I>(store: &EndpointStore, resolved: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut fresh: Vec<String> = Vec::new();
    for url in resolved {
        let url = normalize_endpoint(&url);
        let key = endpoint_key(&url);
        let seen = store.contains(&url) || fresh.iter().any(|u| endpoint_key(u) == key);
        if !seen {
            fresh.push(url);
        }
    }
    fresh
}

/// Short-link resolution results, before they touch the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLinks {
    /// Redirect targets in short-link order
    pub urls: Vec<String>,
    /// Short links that exhausted their retries
    pub failed: usize,
}

/// Follow every short link's redirect
///
/// A failing short link is logged by the resolver and counted. Nothing is
/// written here, so callers can run this without holding the store.
pub async fn resolve_short_links(client: &DuanjuClient, short_urls: &[String]) -> ResolvedLinks {
    let mut links = ResolvedLinks::default();

    info!(count = short_urls.len(), "resolving short links");
    for short_url in short_urls {
        match client.resolve_redirect(short_url).await {
            Some(url) => {
                info!(short_url = %short_url, resolved = %url, "short link resolved");
                links.urls.push(url);
            }
            None => links.failed += 1,
        }
    }
    links
}

/// Append the new endpoints among `links` to the store and persist them
///
/// The store is written once, and only if something was added; a write
/// failure is logged and the additions stay in memory.
pub fn merge_endpoints(store: &mut EndpointStore, links: ResolvedLinks) -> DiscoveryReport {
    let mut report = DiscoveryReport {
        resolved: links.urls.len(),
        failed: links.failed,
        added: Vec::new(),
    };

    let fresh = select_new_endpoints(store, links.urls);
    if fresh.is_empty() {
        info!("no new search endpoints");
        return report;
    }

    store.extend(fresh.iter().cloned());
    for url in &fresh {
        info!(endpoint = %url, "added search endpoint");
    }
    if let Err(e) = store.save() {
        error!(path = %store.path().display(), error = %e, "failed to save endpoint list");
    }

    report.added = fresh;
    report
}

/// Resolve every seed short link and persist newly found endpoints
///
/// [`resolve_short_links`] followed by [`merge_endpoints`].
pub async fn discover_endpoints(client: &DuanjuClient, store: &mut EndpointStore) -> DiscoveryReport {
    let short_urls = store.short_urls().to_vec();
    let links = resolve_short_links(client, &short_urls).await;
    merge_endpoints(store, links)
}
