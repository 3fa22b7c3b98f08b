//! Style definitions shared between clients.

use serde::{Deserialize, Serialize};

/// HSV color representation (hue 0-1, saturation 0-1, value 0-1).
pub type Hsv = [f32; 3];

/// RGB color representation (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub fn hsv_to_rgb([h, s, v]: Hsv) -> Rgb {
    let h = h.rem_euclid(1.0) * 6.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |channel: f32| ((channel + m) * 255.0).round() as u8;
    Rgb::new(to_u8(r), to_u8(g), to_u8(b))
}

macro_rules! style_fields {
    ($(($field:ident, $fn_name:ident, $default:expr)),* $(,)?) => {
        /// Style configuration with HSV colors for various UI elements.
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
        #[serde(default)]
        pub struct Style {
            $(
                #[doc = concat!("HSV colour for ", stringify!($field))]
                pub $field: Hsv,
            )*
            /// Scroll multiplier for mouse wheel scrolling.
            pub scroll_multiplier: f32,
        }
        impl Default for Style {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                    scroll_multiplier: 50.0,
                }
            }
        }
        impl Style {
            $(
                pub fn $fn_name(&self) -> Rgb {
                    hsv_to_rgb(self.$field)
                }
            )*
        }
    }
}

style_fields![
    (background_hsv, background, [0.65, 0.40, 0.08]),
    (text_hsv, text, [0.0, 0.0, 1.0]),
    (tile_title_hsv, tile_title, [0.0, 0.0, 1.0]),
    (skeleton_hsv, skeleton, [0.65, 0.20, 0.22]),
    (skeleton_highlight_hsv, skeleton_highlight, [0.65, 0.20, 0.32]),
    (in_library_hsv, in_library, [0.37, 0.69, 0.54]),
    (accent_hsv, accent, [0.55, 0.70, 1.0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_primary_and_grey_hsv() {
        assert_eq!(hsv_to_rgb([0.0, 1.0, 1.0]), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb([1.0 / 3.0, 1.0, 1.0]), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb([2.0 / 3.0, 1.0, 1.0]), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb([0.3, 0.0, 0.5]), Rgb::new(128, 128, 128));
        assert_eq!(hsv_to_rgb([1.0, 1.0, 1.0]), Rgb::new(255, 0, 0));
    }

    #[test]
    fn in_library_tint_is_green() {
        let rgb = Style::default().in_library();
        assert!(rgb.g > rgb.r && rgb.g > rgb.b);
    }
}
