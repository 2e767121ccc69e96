//! HTML parsers for mirror sites
//!
//! Contains modules for parsing different page types.

pub mod detail;
pub mod search;

pub use detail::parse_pan_link;
pub use search::parse_search_results;
