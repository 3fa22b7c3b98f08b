//! Client-side logic that does not depend on a particular UI toolkit.

pub mod config;
pub mod search_grid;
pub mod style;
pub mod thumbnail_cache;
pub mod thumbnails;

/// The column counts offered in the UI.
pub const LIBRARY_COLUMN_CHOICES: [u32; 4] = [2, 4, 6, 8];
