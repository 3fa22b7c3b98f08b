use std::path::PathBuf;

#[derive(Debug)]
/// An error that can occur when reading series from the filesystem.
pub enum SourceError {
    /// The configured library root does not exist or is not a directory.
    RootMissing(PathBuf),
    /// Reading a directory failed.
    Io {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// Walking a series directory for its cover failed.
    Walk(walkdir::Error),
}
impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::RootMissing(path) => {
                write!(f, "Library root {} is not a directory", path.display())
            }
            SourceError::Io { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            SourceError::Walk(e) => write!(f, "Failed to walk series directory: {e}"),
        }
    }
}
impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::RootMissing(_) => None,
            SourceError::Io { source, .. } => Some(source),
            SourceError::Walk(e) => Some(e),
        }
    }
}
impl From<walkdir::Error> for SourceError {
    fn from(e: walkdir::Error) -> Self {
        SourceError::Walk(e)
    }
}
/// A result type for the filesystem source.
pub type SourceResult<T> = Result<T, SourceError>;
