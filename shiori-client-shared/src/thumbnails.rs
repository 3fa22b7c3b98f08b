//! The on-disk thumbnail directory: where it lives, making sure it exists, and
//! reading and writing downsized covers inside it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use etcetera::BaseStrategy as _;
use shiori_core::shiori_state::SeriesKey;

const APP_DIR_NAME: &str = "shiori";
const THUMBNAILS_DIR_NAME: &str = "thumbnails";
/// Covers wider than this are shrunk before being written to disk.
const THUMBNAIL_WIDTH: u32 = 320;

/// Supplies the directory cover thumbnails are cached in. Resolved once at
/// startup and handed to the views that need it.
pub trait ThumbnailsDirProvider {
    fn thumbnails_dir(&self) -> PathBuf;
}

/// The thumbnail directory under the platform cache directory, unless the
/// configuration overrides it.
#[derive(Debug, Clone)]
pub struct PlatformThumbnailsDir {
    path: PathBuf,
}
impl PlatformThumbnailsDir {
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        let path = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => match etcetera::choose_base_strategy() {
                Ok(strategy) => strategy
                    .cache_dir()
                    .join(APP_DIR_NAME)
                    .join(THUMBNAILS_DIR_NAME),
                Err(e) => {
                    tracing::warn!("could not find a cache directory ({e}), using ./{THUMBNAILS_DIR_NAME}");
                    PathBuf::from(THUMBNAILS_DIR_NAME)
                }
            },
        };
        Self { path }
    }
}
impl ThumbnailsDirProvider for PlatformThumbnailsDir {
    fn thumbnails_dir(&self) -> PathBuf {
        self.path.clone()
    }
}

/// Create the thumbnail directory if it does not exist yet. An existing
/// directory is not an error, so this can be called any number of times.
pub fn ensure_thumbnails_dir(dir: &Path) -> std::io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
}

/// Ensure the provider's directory exists, returning it on success. Failure only
/// costs disk caching, so it is logged rather than propagated.
pub fn prepare_thumbnails_dir(provider: &dyn ThumbnailsDirProvider) -> Option<PathBuf> {
    let dir = provider.thumbnails_dir();
    match ensure_thumbnails_dir(&dir) {
        Ok(()) => {
            tracing::info!("thumbnail directory: {}", dir.display());
            Some(dir)
        }
        Err(e) => {
            tracing::warn!(
                "failed to create thumbnail directory {}, thumbnails will not be cached on disk: {e}",
                dir.display()
            );
            None
        }
    }
}

pub fn thumbnail_path(dir: &Path, key: &SeriesKey) -> PathBuf {
    let safe_filename = key
        .to_string()
        .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
    dir.join(format!("{safe_filename}.png"))
}

pub fn load_from_disk(dir: &Path, key: &SeriesKey) -> Option<Arc<[u8]>> {
    let path = thumbnail_path(dir, key);
    match std::fs::read(&path) {
        Ok(data) => {
            tracing::debug!("loaded thumbnail for {key} from disk");
            Some(data.into())
        }
        Err(_) => None,
    }
}

/// Shrink `image_data` to thumbnail width and write it to `path` as PNG.
pub fn save_to_disk(path: &Path, image_data: &[u8]) {
    let Ok(img) = image::load_from_memory(image_data) else {
        tracing::warn!("failed to decode image for {}", path.display());
        return;
    };

    let img = if img.width() > THUMBNAIL_WIDTH {
        let height = (img.height() as u64 * THUMBNAIL_WIDTH as u64 / img.width() as u64).max(1);
        img.resize_exact(
            THUMBNAIL_WIDTH,
            height as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        img
    };

    let mut buffer = std::io::Cursor::new(Vec::new());
    if let Err(e) = img.write_to(&mut buffer, image::ImageFormat::Png) {
        tracing::warn!("failed to encode thumbnail for {}: {e}", path.display());
        return;
    }

    if let Err(e) = std::fs::write(path, buffer.into_inner()) {
        tracing::warn!("failed to save thumbnail to {}: {e}", path.display());
    } else {
        tracing::debug!("saved thumbnail to {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use shiori_core::shiori_state::{FS_METADATA, SourceId};

    use super::*;

    struct FixedDir(PathBuf);
    impl ThumbnailsDirProvider for FixedDir {
        fn thumbnails_dir(&self) -> PathBuf {
            self.0.clone()
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn ensuring_twice_succeeds() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("cache").join("thumbnails");

        ensure_thumbnails_dir(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_thumbnails_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn prepare_logs_and_continues_when_creation_fails() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        assert_eq!(prepare_thumbnails_dir(&FixedDir(blocker.join("thumbnails"))), None);

        let ok = root.path().join("thumbnails");
        assert_eq!(prepare_thumbnails_dir(&FixedDir(ok.clone())), Some(ok));
    }

    #[test]
    fn override_dir_takes_precedence() {
        let resolved = PlatformThumbnailsDir::resolve(Some(Path::new("/tmp/covers")));
        assert_eq!(resolved.thumbnails_dir(), PathBuf::from("/tmp/covers"));
    }

    #[test]
    fn saved_thumbnails_are_shrunk_and_reloadable() {
        let dir = tempfile::tempdir().unwrap();
        let key = SeriesKey {
            extension_id: FS_METADATA,
            source_id: SourceId::from("a/b:c"),
        };
        let path = thumbnail_path(dir.path(), &key);
        assert_eq!(path.file_name().unwrap(), "fs-metadata_a_b_c.png");
        assert!(load_from_disk(dir.path(), &key).is_none());

        save_to_disk(&path, &png_bytes(640, 960));
        let data = load_from_disk(dir.path(), &key).unwrap();
        let img = image::load_from_memory(&data).unwrap();
        assert_eq!((img.width(), img.height()), (THUMBNAIL_WIDTH, 480));
    }

    #[test]
    fn undecodable_images_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        save_to_disk(&path, b"definitely not an image");
        assert!(!path.exists());
    }
}
