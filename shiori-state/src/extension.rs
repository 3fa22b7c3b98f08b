use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identifies the content source (search extension) a series was found through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionId(pub SmolStr);

/// The built-in source backed by series directories on the local filesystem.
/// Series found through it have user-editable metadata.
pub const FS_METADATA: ExtensionId = ExtensionId::new_static("fs-metadata");

impl ExtensionId {
    /// Create an extension ID from a static string without allocating.
    pub const fn new_static(id: &'static str) -> Self {
        Self(SmolStr::new_static(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ExtensionId {
    fn from(id: &str) -> Self {
        Self(SmolStr::new(id))
    }
}

impl std::fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
