use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shiori_state::{ExtensionId, SearchResult, Series, SeriesKey};

/// Everything the UI shares, split into the slices each view reads or writes.
pub struct AppState {
    pub search: SearchState,
    pub settings: Settings,
    pub add_modal: AddModalState,
    pub library: Library,

    pub error: Option<AppStateError>,
}
impl AppState {
    pub fn new(search_extension: ExtensionId, settings: Settings) -> Self {
        Self {
            search: SearchState::new(search_extension),
            settings,
            add_modal: AddModalState::default(),
            library: Library::default(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// How many tiles wide the library and search grids are.
    pub library_columns: u32,
}
impl Default for Settings {
    fn default() -> Self {
        Self { library_columns: 4 }
    }
}

/// The series the add dialog is about, and whether it is showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddModalState {
    pub series: Option<Series>,
    /// Whether the series' metadata may be edited before adding.
    pub editable: bool,
    pub showing: bool,
}
impl AddModalState {
    pub fn close(&mut self) {
        self.showing = false;
    }
}

/// The series the user has added, for the duration of the session.
#[derive(Debug, Default)]
pub struct Library {
    keys: HashSet<SeriesKey>,
}
impl Library {
    pub fn contains(&self, series: &Series) -> bool {
        self.keys.contains(&series.key())
    }

    /// Returns false if the series was already present.
    pub fn add(&mut self, series: &Series) -> bool {
        self.keys.insert(series.key())
    }
}

/// The active search and the pages fetched for it so far.
#[derive(Debug)]
pub struct SearchState {
    pub extension_id: ExtensionId,
    pub query: String,
    pub result: SearchResult,
    pub loading: bool,
    /// The last page requested, 1-based; 0 before the first request.
    page: u32,
    /// Bumped by every fresh search so that pages of an older search are dropped.
    generation: u64,
}

/// A page fetch handed out by [`SearchState::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub extension_id: ExtensionId,
    pub query: String,
    pub page: u32,
    generation: u64,
}

impl SearchState {
    pub fn new(extension_id: ExtensionId) -> Self {
        Self {
            extension_id,
            query: String::new(),
            result: SearchResult::default(),
            loading: false,
            page: 0,
            generation: 0,
        }
    }

    /// Start fetching either the first page of a new search (`fresh`) or the next
    /// page of the current one.
    ///
    /// Returns `None` when there is nothing to do: a next page was asked for while
    /// one is still loading, or after the last page. A fresh search always starts,
    /// superseding whatever is in flight.
    pub fn begin(&mut self, fresh: bool) -> Option<SearchRequest> {
        if fresh {
            self.generation += 1;
            self.page = 0;
            self.result = SearchResult::pending();
        } else if self.loading || !self.result.has_more {
            return None;
        }

        self.page += 1;
        self.loading = true;
        Some(SearchRequest {
            extension_id: self.extension_id.clone(),
            query: self.query.clone(),
            page: self.page,
            generation: self.generation,
        })
    }

    /// Apply a fetched page. Returns false (and changes nothing) if the request
    /// belongs to a superseded search.
    pub fn complete(&mut self, request: &SearchRequest, page: SearchResult) -> bool {
        if request.generation != self.generation {
            return false;
        }
        if request.page <= 1 {
            self.result = page;
        } else {
            self.result.append_page(page);
        }
        self.loading = false;
        true
    }

    /// Record that a fetch failed; no further pages are requested for this search.
    /// Returns false if the request belongs to a superseded search.
    pub fn fail(&mut self, request: &SearchRequest) -> bool {
        if request.generation != self.generation {
            return false;
        }
        self.result.has_more = false;
        self.loading = false;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppStateError {
    SearchFailed { extension_id: String, error: String },
    UnknownExtension { extension_id: String },
}
impl AppStateError {
    /// Should be paired with [`Self::display_message`]
    pub fn display_name(&self) -> &'static str {
        match self {
            AppStateError::SearchFailed { .. } => "Search failed",
            AppStateError::UnknownExtension { .. } => "Unknown search source",
        }
    }

    /// Should be paired with [`Self::display_name`]
    pub fn display_message(&self) -> String {
        match self {
            AppStateError::SearchFailed {
                extension_id,
                error,
            } => format!("Searching `{extension_id}` failed: {error}"),
            AppStateError::UnknownExtension { extension_id } => {
                format!("No search source is registered for `{extension_id}`")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiori_state::{FS_METADATA, SourceId};

    fn series(id: &str) -> Series {
        Series {
            extension_id: FS_METADATA,
            source_id: SourceId::from(id),
            title: id.to_uppercase(),
            remote_cover_url: String::new(),
            description: String::new(),
        }
    }

    fn page(ids: &[&str], has_more: bool) -> SearchResult {
        SearchResult {
            series_list: ids.iter().map(|id| series(id)).collect(),
            has_more,
        }
    }

    #[test]
    fn next_page_is_ignored_before_any_search() {
        let mut search = SearchState::new(FS_METADATA);
        assert_eq!(search.begin(false), None);
        assert!(!search.loading);
    }

    #[test]
    fn pages_accumulate_until_exhausted() {
        let mut search = SearchState::new(FS_METADATA);
        search.query = "abc".to_string();

        let first = search.begin(true).unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(first.query, "abc");
        assert!(search.loading);
        assert!(search.result.is_empty());

        // Overlapping next-page requests are refused while loading.
        assert_eq!(search.begin(false), None);

        assert!(search.complete(&first, page(&["a", "b"], true)));
        assert!(!search.loading);

        let second = search.begin(false).unwrap();
        assert_eq!(second.page, 2);
        assert!(search.complete(&second, page(&["c"], false)));
        assert_eq!(search.result.len(), 3);
        assert!(!search.result.has_more);

        assert_eq!(search.begin(false), None);
    }

    #[test]
    fn fresh_search_discards_stale_pages() {
        let mut search = SearchState::new(FS_METADATA);
        let old = search.begin(true).unwrap();
        assert!(search.complete(&old, page(&["a"], true)));
        let old_next = search.begin(false).unwrap();

        // A new search starts even though a page is still loading.
        let fresh = search.begin(true).unwrap();
        assert_eq!(fresh.page, 1);
        assert!(search.result.is_empty());
        assert!(search.result.has_more);

        assert!(!search.complete(&old_next, page(&["stale"], true)));
        assert!(!search.fail(&old_next));
        assert!(search.loading);
        assert!(search.result.is_empty());

        assert!(search.complete(&fresh, page(&["x"], false)));
        assert_eq!(search.result.series_list[0].source_id, SourceId::from("x"));
    }

    #[test]
    fn failure_stops_pagination() {
        let mut search = SearchState::new(FS_METADATA);
        let request = search.begin(true).unwrap();
        assert!(search.fail(&request));
        assert!(!search.loading);
        assert!(!search.result.has_more);
        assert_eq!(search.begin(false), None);
    }

    #[test]
    fn library_membership_is_per_source() {
        let mut library = Library::default();
        let local = series("berserk");
        let mut remote = local.clone();
        remote.extension_id = ExtensionId::from("remote");

        assert!(library.add(&local));
        assert!(!library.add(&local));
        assert!(library.contains(&local));
        assert!(!library.contains(&remote));
        assert!(library.add(&remote));
        assert!(library.contains(&remote));
    }
}
