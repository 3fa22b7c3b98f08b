use serde::{Deserialize, Serialize};

use crate::Series;

/// One or more pages of search results, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The series found so far.
    pub series_list: Vec<Series>,
    /// Whether the source has further pages for the same search.
    pub has_more: bool,
}

impl SearchResult {
    /// An empty result that still expects its first page.
    pub fn pending() -> Self {
        Self {
            series_list: Vec::new(),
            has_more: true,
        }
    }

    /// Append the next page; `has_more` follows the latest page.
    pub fn append_page(&mut self, page: SearchResult) {
        self.series_list.extend(page.series_list);
        self.has_more = page.has_more;
    }

    /// Whether no series have been found.
    pub fn is_empty(&self) -> bool {
        self.series_list.is_empty()
    }

    /// The number of series found so far.
    pub fn len(&self) -> usize {
        self.series_list.len()
    }
}
