//! Representations of the series shiori browses and the paginated search results
//! that carry them.
//!
//! Separated out so that sources and clients can share them without depending on
//! the rest of the application.
#![deny(missing_docs)]

mod extension;
pub use extension::{ExtensionId, FS_METADATA};

mod series;
pub use series::{Series, SeriesKey, SourceId};

mod search_result;
pub use search_result::SearchResult;
