//! Core data types for the short-drama scraper

use serde::{Deserialize, Serialize};

use crate::error::DuanjuError;

/// One search hit with its extracted cloud-storage share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display title, `<strong>` markup stripped
    pub title: String,

    /// Quark share URL (`https://pan.quark.cn/s/<id>`)
    pub pan_link: String,
}

/// Anchor on a results page that looks like a detail-page link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub href: String,
}

/// Result of a full search across the endpoint list
///
/// `endpoint` names the base URL that produced `results`. It is `None`
/// when every endpoint was dead or empty, in which case `results` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub endpoint: Option<String>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Tri-state result of a single scrape step
///
/// Separates "the page had nothing for us" from "the request failed",
/// so the caller can log the two differently and move on either way.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Data was found
    Found(T),
    /// The page was fetched but held nothing usable
    Empty,
    /// Transport or status failure
    Failed(DuanjuError),
}

impl<T> Outcome<T> {
    /// Converts into `Option`, dropping the failure reason
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Empty | Outcome::Failed(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}
