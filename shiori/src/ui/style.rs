use egui::Color32;
use shiori_client_shared::style as shared_style;

/// Re-export the shared Style type.
pub use shared_style::Style;

fn rgb_to_color32(rgb: shared_style::Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Extension trait for Style to get egui Color32 values.
pub trait StyleExt {
    fn background_color32(&self) -> Color32;
    fn text_color32(&self) -> Color32;
    fn tile_title_color32(&self) -> Color32;
    fn skeleton_color32(&self) -> Color32;
    fn skeleton_highlight_color32(&self) -> Color32;
    fn in_library_color32(&self) -> Color32;
    fn accent_color32(&self) -> Color32;
}

impl StyleExt for Style {
    fn background_color32(&self) -> Color32 {
        rgb_to_color32(self.background())
    }
    fn text_color32(&self) -> Color32 {
        rgb_to_color32(self.text())
    }
    fn tile_title_color32(&self) -> Color32 {
        rgb_to_color32(self.tile_title())
    }
    fn skeleton_color32(&self) -> Color32 {
        rgb_to_color32(self.skeleton())
    }
    fn skeleton_highlight_color32(&self) -> Color32 {
        rgb_to_color32(self.skeleton_highlight())
    }
    fn in_library_color32(&self) -> Color32 {
        rgb_to_color32(self.in_library())
    }
    fn accent_color32(&self) -> Color32 {
        rgb_to_color32(self.accent())
    }
}
