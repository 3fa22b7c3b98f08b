use std::path::{Path, PathBuf};

use shiori_state::{FS_METADATA, SearchResult, Series, SourceId};
use walkdir::WalkDir;

use crate::{SourceError, SourceResult};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];
const COVER_FILE_STEM: &str = "cover";
const DESCRIPTION_FILENAME: &str = "description.txt";
// The series directory itself, plus one level of chapter directories.
const COVER_SEARCH_DEPTH: usize = 2;

/// A source that treats each directory directly under `root` as a series.
///
/// The directory name is both the series' source ID and its title. The cover is
/// an image named `cover.*` if there is one, otherwise the first image found.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    root: PathBuf,
    page_size: usize,
}

impl FilesystemSource {
    /// The number of series per page when nothing else is configured.
    pub const DEFAULT_PAGE_SIZE: usize = 24;

    /// Create a source rooted at `root`, returning at most `page_size` series
    /// per page.
    pub fn new(root: impl Into<PathBuf>, page_size: usize) -> Self {
        Self {
            root: root.into(),
            page_size: page_size.max(1),
        }
    }

    /// The library root this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `page`th page (1-based) of series whose titles contain `query`,
    /// ignoring case. An empty query matches every series.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing or cannot be read.
    pub fn search(&self, query: &str, page: u32) -> SourceResult<SearchResult> {
        let query = query.trim().to_lowercase();
        let mut series = self.list_series()?;
        if !query.is_empty() {
            series.retain(|s| s.title.to_lowercase().contains(&query));
        }

        let offset = (page.max(1) as usize - 1) * self.page_size;
        let has_more = offset + self.page_size < series.len();
        let series_list = series
            .into_iter()
            .skip(offset)
            .take(self.page_size)
            .collect();

        Ok(SearchResult {
            series_list,
            has_more,
        })
    }

    fn list_series(&self) -> SourceResult<Vec<Series>> {
        if !self.root.is_dir() {
            return Err(SourceError::RootMissing(self.root.clone()));
        }
        let root = std::path::absolute(&self.root).unwrap_or_else(|_| self.root.clone());

        let io_error = |source| SourceError::Io {
            path: root.clone(),
            source,
        };

        let mut series = Vec::new();
        for entry in std::fs::read_dir(&root).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            series.push(read_series(&path, name)?);
        }

        series.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(series)
    }
}

fn read_series(dir: &Path, name: &str) -> SourceResult<Series> {
    let remote_cover_url = find_cover(dir)?
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default();
    let description = std::fs::read_to_string(dir.join(DESCRIPTION_FILENAME))
        .map(|d| d.trim().to_string())
        .unwrap_or_default();

    Ok(Series {
        extension_id: FS_METADATA,
        source_id: SourceId::from(name),
        title: name.to_string(),
        remote_cover_url,
        description,
    })
}

fn find_cover(dir: &Path) -> SourceResult<Option<PathBuf>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(COVER_SEARCH_DEPTH)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            images.push(entry.into_path());
        }
    }

    let named_cover = images.iter().position(|path| {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.eq_ignore_ascii_case(COVER_FILE_STEM))
    });
    Ok(match named_cover {
        Some(index) => Some(images.swap_remove(index)),
        None => images.into_iter().next(),
    })
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_series_dir(root: &Path, name: &str, files: &[&str]) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        for file in files {
            let path = dir.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"").unwrap();
        }
    }

    fn titles(result: &SearchResult) -> Vec<&str> {
        result.series_list.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn paginates_series_sorted_case_insensitively() {
        let root = tempfile::tempdir().unwrap();
        for name in ["delta", "Alpha", "charlie", "Bravo", "echo"] {
            make_series_dir(root.path(), name, &[]);
        }
        // Loose files and hidden directories are not series.
        std::fs::write(root.path().join("notes.txt"), b"").unwrap();
        make_series_dir(root.path(), ".trash", &[]);

        let source = FilesystemSource::new(root.path(), 2);

        let page = source.search("", 1).unwrap();
        assert_eq!(titles(&page), ["Alpha", "Bravo"]);
        assert!(page.has_more);

        let page = source.search("", 2).unwrap();
        assert_eq!(titles(&page), ["charlie", "delta"]);
        assert!(page.has_more);

        let page = source.search("", 3).unwrap();
        assert_eq!(titles(&page), ["echo"]);
        assert!(!page.has_more);

        let page = source.search("", 4).unwrap();
        assert!(page.series_list.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn filters_by_title_ignoring_case() {
        let root = tempfile::tempdir().unwrap();
        for name in ["One Piece", "Onepunch", "Berserk"] {
            make_series_dir(root.path(), name, &[]);
        }

        let source = FilesystemSource::new(root.path(), FilesystemSource::DEFAULT_PAGE_SIZE);
        let page = source.search("  ONE ", 1).unwrap();
        assert_eq!(titles(&page), ["One Piece", "Onepunch"]);
        assert!(!page.has_more);

        let series = &page.series_list[0];
        assert_eq!(series.extension_id, FS_METADATA);
        assert_eq!(series.source_id, SourceId::from("One Piece"));
    }

    #[test]
    fn prefers_named_cover_over_first_image() {
        let root = tempfile::tempdir().unwrap();
        make_series_dir(
            root.path(),
            "with-cover",
            &["01/001.png", "a.jpg", "Cover.JPG", "readme.md"],
        );
        make_series_dir(root.path(), "without-cover", &["02/010.webp", "02/002.webp"]);
        make_series_dir(root.path(), "no-images", &["info.txt"]);

        let source = FilesystemSource::new(root.path(), 10);
        let page = source.search("", 1).unwrap();
        let cover_of = |title: &str| {
            let series = page.series_list.iter().find(|s| s.title == title).unwrap();
            PathBuf::from(&series.remote_cover_url)
        };

        assert_eq!(cover_of("with-cover").file_name().unwrap(), "Cover.JPG");
        assert!(cover_of("with-cover").is_absolute());
        assert_eq!(cover_of("without-cover").file_name().unwrap(), "002.webp");
        assert_eq!(cover_of("no-images"), PathBuf::new());
    }

    #[test]
    fn reads_optional_description() {
        let root = tempfile::tempdir().unwrap();
        make_series_dir(root.path(), "Described", &[]);
        std::fs::write(
            root.path().join("Described").join(DESCRIPTION_FILENAME),
            "  A long story.\n",
        )
        .unwrap();
        make_series_dir(root.path(), "Plain", &[]);

        let page = FilesystemSource::new(root.path(), 10).search("", 1).unwrap();
        assert_eq!(page.series_list[0].description, "A long story.");
        assert_eq!(page.series_list[1].description, "");
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let source = FilesystemSource::new(root.path().join("nope"), 10);
        assert!(matches!(
            source.search("", 1),
            Err(SourceError::RootMissing(_))
        ));
    }
}
