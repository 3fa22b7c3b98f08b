use shiori_state::{ExtensionId, FS_METADATA, SearchResult};

use crate::sf::FilesystemSource;

pub type SearchError = Box<dyn std::error::Error + Send + Sync>;

/// A content source that can be searched page by page.
///
/// Implementations may block; [`crate::Logic`] only calls them from the
/// background runtime's blocking pool.
pub trait SearchSource: Send + Sync {
    /// The identifier series from this source carry.
    fn extension_id(&self) -> ExtensionId;

    /// Fetch the 1-based `page` of results for `query`. An empty query browses
    /// everything the source has.
    fn search(&self, query: &str, page: u32) -> Result<SearchResult, SearchError>;
}

impl SearchSource for FilesystemSource {
    fn extension_id(&self) -> ExtensionId {
        FS_METADATA
    }

    fn search(&self, query: &str, page: u32) -> Result<SearchResult, SearchError> {
        Ok(FilesystemSource::search(self, query, page)?)
    }
}
