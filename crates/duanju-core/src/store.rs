//! Persisted list of search endpoints and seed short links
//!
//! The on-disk document is `{ "base_urls": [...], "short_urls": [...] }`.
//! Endpoints are only ever appended; membership is checked on the
//! slash-stripped form so the same mirror is never stored twice.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::Result;
use crate::url::endpoint_key;

/// File name of the endpoint document inside the plugin data directory
pub const ENDPOINTS_FILE: &str = "search_urls.json";

#[derive(Debug, Serialize)]
struct EndpointDocument<'a> {
    base_urls: &'a [String],
    short_urls: &'a [String],
}

#[derive(Debug, Deserialize)]
struct StoredDocument {
    base_urls: Option<Vec<String>>,
    short_urls: Option<Vec<String>>,
}

/// Durable endpoint list
#[derive(Debug, Clone)]
pub struct EndpointStore {
    base_urls: Vec<String>,
    short_urls: Vec<String>,
    path: PathBuf,
}

impl EndpointStore {
    /// Create an in-memory store bound to `path` without touching the disk
    pub fn new(path: impl Into<PathBuf>, base_urls: Vec<String>, short_urls: Vec<String>) -> Self {
        let mut store = Self {
            base_urls: Vec::new(),
            short_urls,
            path: path.into(),
        };
        store.extend(base_urls);
        store
    }

    /// Load the store from `path`, falling back to the given defaults
    ///
    /// A missing file is created from the defaults. An unreadable or
    /// malformed file is logged and the defaults are used in memory.
    /// A document lacking one of the keys takes that key's default.
    pub fn load(
        path: impl Into<PathBuf>,
        default_base_urls: Vec<String>,
        default_short_urls: Vec<String>,
    ) -> Self {
        let path = path.into();

        if !path.exists() {
            let store = Self::new(path, default_base_urls, default_short_urls);
            if let Err(e) = store.save() {
                error!(path = %store.path.display(), error = %e, "failed to create endpoint file");
            }
            return store;
        }

        match Self::read_document(&path) {
            Ok(doc) => Self::new(
                path,
                doc.base_urls.unwrap_or(default_base_urls),
                doc.short_urls.unwrap_or(default_short_urls),
            ),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load endpoint file, using defaults");
                Self::new(path, default_base_urls, default_short_urls)
            }
        }
    }

    fn read_document(path: &Path) -> Result<StoredDocument> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the whole document to disk as pretty-printed JSON
    pub fn save(&self) -> Result<()> {
        let doc = EndpointDocument {
            base_urls: &self.base_urls,
            short_urls: &self.short_urls,
        };
        let json = serde_json::to_string_pretty(&doc)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "endpoint list saved");
        Ok(())
    }

    /// Whether an endpoint is already stored, ignoring trailing slashes
    pub fn contains(&self, url: &str) -> bool {
        let key = endpoint_key(url);
        self.base_urls.iter().any(|u| endpoint_key(u) == key)
    }

    /// Append endpoints not yet present; returns how many were added
    pub fn extend<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.base_urls.len();
        for url in urls {
            if !self.contains(&url) {
                self.base_urls.push(url);
            }
        }
        self.base_urls.len() - before
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    pub fn short_urls(&self) -> &[String] {
        &self.short_urls
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
