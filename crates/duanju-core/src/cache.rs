//! Per-requester cache of the most recent search results
//!
//! Turns the two-step search/detail interaction into a numeric lookup:
//! a search stores its results under the requester's identity, and a
//! later `#<index>` request reads them back without any network I/O.
//!
//! Expiry is checked on every read, so an entry is never visible once
//! its TTL has passed. [`ResultCache::purge_expired`] additionally drops
//! stale entries to reclaim memory and is called at the start of each
//! request by the plugin.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::error::LookupError;
use crate::types::SearchResult;

/// Default validity window of a cache entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Requester identity: chat (group) plus sender
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequesterId {
    pub group_id: String,
    pub sender_id: String,
}

impl RequesterId {
    pub fn new(group_id: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            sender_id: sender_id.into(),
        }
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.group_id, self.sender_id)
    }
}

/// Cached outcome of one search
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub results: Vec<SearchResult>,
    pub keyword: String,
    /// Endpoint the results came from
    pub endpoint: Option<String>,
    pub created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// TTL-bounded map from requester to their last search
#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<RequesterId, CacheEntry>,
    ttl: Duration,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Store results for `identity`, replacing any previous entry
    pub fn put(
        &mut self,
        identity: RequesterId,
        keyword: impl Into<String>,
        results: Vec<SearchResult>,
        endpoint: Option<String>,
    ) {
        self.put_at(identity, keyword, results, endpoint, Instant::now());
    }

    /// [`put`](Self::put) with an explicit creation time
    pub fn put_at(
        &mut self,
        identity: RequesterId,
        keyword: impl Into<String>,
        results: Vec<SearchResult>,
        endpoint: Option<String>,
        now: Instant,
    ) {
        self.entries.insert(
            identity,
            CacheEntry {
                results,
                keyword: keyword.into(),
                endpoint,
                created_at: now,
            },
        );
    }

    /// Live entry for `identity`, if any
    pub fn get(&self, identity: &RequesterId) -> Option<&CacheEntry> {
        self.get_at(identity, Instant::now())
    }

    /// [`get`](Self::get) evaluated at `now`
    pub fn get_at(&self, identity: &RequesterId, now: Instant) -> Option<&CacheEntry> {
        self.entries
            .get(identity)
            .filter(|entry| !entry.is_expired(now, self.ttl))
    }

    /// Drop every entry whose age has reached the TTL; returns how many
    ///
    /// Only reclaims memory. Expired entries are already invisible to
    /// [`get`](Self::get) and [`resolve_index`](Self::resolve_index), so
    /// lookups stay correct whether or not this ever runs.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - self.entries.len()
    }

    /// 1-based lookup into the requester's cached results
    ///
    /// # Errors
    /// - `NotFound` - no live entry for `identity`
    /// - `OutOfRange` - `index` outside `1..=len`
    pub fn resolve_index(
        &self,
        identity: &RequesterId,
        index: usize,
    ) -> Result<&SearchResult, LookupError> {
        self.resolve_index_at(identity, index, Instant::now())
    }

    /// [`resolve_index`](Self::resolve_index) evaluated at `now`
    pub fn resolve_index_at(
        &self,
        identity: &RequesterId,
        index: usize,
        now: Instant,
    ) -> Result<&SearchResult, LookupError> {
        let entry = self.get_at(identity, now).ok_or(LookupError::NotFound)?;
        let len = entry.results.len();
        index
            .checked_sub(1)
            .and_then(|i| entry.results.get(i))
            .ok_or(LookupError::OutOfRange { index, len })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(n: u32) -> SearchResult {
        SearchResult {
            title: format!("第{}部", n),
            pan_link: format!("https://pan.quark.cn/s/link{}", n),
        }
    }

    fn alice() -> RequesterId {
        RequesterId::new("123@chatroom", "wxid_alice")
    }

    #[test]
    fn test_requester_id_display() {
        assert_eq!(alice().to_string(), "123@chatroom_wxid_alice");
    }

    #[test]
    fn test_resolve_index_first_result() {
        let mut cache = ResultCache::default();
        cache.put(alice(), "kw", vec![result(1), result(2)], None);

        assert_eq!(cache.resolve_index(&alice(), 1), Ok(&result(1)));
        assert_eq!(cache.resolve_index(&alice(), 2), Ok(&result(2)));
    }

    #[test]
    fn test_resolve_index_out_of_range() {
        let mut cache = ResultCache::default();
        cache.put(alice(), "kw", vec![result(1), result(2)], None);

        assert_eq!(
            cache.resolve_index(&alice(), 3),
            Err(LookupError::OutOfRange { index: 3, len: 2 })
        );
        assert_eq!(
            cache.resolve_index(&alice(), 0),
            Err(LookupError::OutOfRange { index: 0, len: 2 })
        );
    }

    #[test]
    fn test_resolve_index_no_entry() {
        let cache = ResultCache::default();
        assert_eq!(cache.resolve_index(&alice(), 1), Err(LookupError::NotFound));
    }

    #[test]
    fn test_entry_invisible_after_ttl() {
        let mut cache = ResultCache::default();
        assert_eq!(cache.ttl(), DEFAULT_TTL);
        let start = Instant::now();
        cache.put_at(alice(), "kw", vec![result(1)], None, start);

        let later = start + cache.ttl();
        assert!(cache.get_at(&alice(), later).is_none());
        assert_eq!(
            cache.resolve_index_at(&alice(), 1, later),
            Err(LookupError::NotFound)
        );

        let just_before = start + DEFAULT_TTL - Duration::from_secs(1);
        assert!(cache.get_at(&alice(), just_before).is_some());
    }

    #[test]
    fn test_purge_expired_removes_only_stale() {
        let mut cache = ResultCache::new(Duration::from_secs(10));
        let start = Instant::now();
        let bob = RequesterId::new("123@chatroom", "wxid_bob");

        cache.put_at(alice(), "old", vec![result(1)], None, start);
        cache.put_at(bob.clone(), "new", vec![result(2)], None, start + Duration::from_secs(8));

        let removed = cache.purge_expired(start + Duration::from_secs(12));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at(&bob, start + Duration::from_secs(12)).is_some());
    }

    #[test]
    fn test_put_overwrites_previous_search() {
        let mut cache = ResultCache::default();
        cache.put(alice(), "first", vec![result(1), result(2)], None);
        cache.put(
            alice(),
            "second",
            vec![result(9)],
            Some("https://b.21410.com/search.php".to_string()),
        );

        let entry = cache.get(&alice()).unwrap();
        assert_eq!(entry.keyword, "second");
        assert_eq!(entry.results, vec![result(9)]);
        assert_eq!(entry.endpoint.as_deref(), Some("https://b.21410.com/search.php"));
    }

    #[test]
    fn test_identities_are_isolated() {
        let mut cache = ResultCache::default();
        let other_group = RequesterId::new("456@chatroom", "wxid_alice");
        cache.put(alice(), "kw", vec![result(1)], None);

        assert_eq!(cache.resolve_index(&other_group, 1), Err(LookupError::NotFound));
    }
}
