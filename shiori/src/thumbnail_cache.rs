use std::{borrow::Cow, io::Cursor, sync::Arc};

use shiori_client_shared::thumbnail_cache::ClientData;
use shiori_core::shiori_state::SeriesKey;

pub type ThumbnailCache = shiori_client_shared::thumbnail_cache::ThumbnailCache<EguiThumbnail>;

/// Cover bytes in the form egui's image loaders want them.
#[derive(Clone)]
pub struct EguiThumbnail {
    uri: String,
    bytes: Arc<[u8]>,
    /// Width over height, if the header could be read.
    pub aspect_ratio: Option<f32>,
}
impl ClientData for EguiThumbnail {
    fn from_image_data(data: &Arc<[u8]>, key: &SeriesKey) -> Self {
        let aspect_ratio = image::ImageReader::new(Cursor::new(&data[..]))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok())
            .filter(|(width, height)| *width > 0 && *height > 0)
            .map(|(width, height)| width as f32 / height as f32);

        Self {
            uri: thumbnail_uri(key),
            bytes: data.clone(),
            aspect_ratio,
        }
    }
}
impl EguiThumbnail {
    pub fn image_source(&self) -> egui::ImageSource<'static> {
        egui::ImageSource::Bytes {
            uri: Cow::Owned(self.uri.clone()),
            bytes: self.bytes.clone().into(),
        }
    }
}

pub fn thumbnail_uri(key: &SeriesKey) -> String {
    format!("bytes://thumbnail/{key}")
}
