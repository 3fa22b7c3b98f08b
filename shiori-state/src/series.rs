use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::ExtensionId;

/// The identifier a source uses for one of its series. Unique within a single
/// source's result list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub SmolStr);

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(SmolStr::new(id))
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry for one comic/manga title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// The source this series was found through.
    pub extension_id: ExtensionId,
    /// The source's identifier for this series.
    pub source_id: SourceId,
    /// The display title.
    pub title: String,
    /// Where to fetch the cover from: an http(s) URL or a local path.
    pub remote_cover_url: String,
    /// A free-form description, empty if the source has none.
    #[serde(default)]
    pub description: String,
}

impl Series {
    /// The globally unique key of this series, across all sources.
    pub fn key(&self) -> SeriesKey {
        SeriesKey {
            extension_id: self.extension_id.clone(),
            source_id: self.source_id.clone(),
        }
    }
}

/// Identifies a series across sources: the pair of its source and the source's ID for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    /// The source the series belongs to.
    pub extension_id: ExtensionId,
    /// The source's identifier for the series.
    pub source_id: SourceId,
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.extension_id, self.source_id)
    }
}
