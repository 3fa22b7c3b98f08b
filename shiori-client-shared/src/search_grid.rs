//! Search grid behaviour shared between clients: how many skeletons to show, how
//! tall tiles are, what a click on a tile does, and when to fetch the next page.
//!
//! Clients measure their own viewport and feed the numbers in; everything that
//! touches shared state goes through a [`SearchGridHost`].

use std::path::{Path, PathBuf};

use shiori_core::{
    AddModalState, Logic,
    shiori_state::{ExtensionId, FS_METADATA, Series},
};

use crate::thumbnails::{self, ThumbnailsDirProvider};

/// Tile height is this fraction of the viewport width, divided by the column count.
pub const TILE_HEIGHT_FACTOR: f32 = 1.05;
/// The next page is fetched once the unseen content below the viewport is less
/// than this fraction of the viewport's height.
pub const SCROLL_FETCH_RATIO: f32 = 0.3;
/// Skeletons shown for column counts without an entry in [`skeleton_count`].
pub const DEFAULT_SKELETON_COUNT: usize = 8;

/// The shared state and actions the search grid needs.
pub trait SearchGridHost {
    fn in_library(&self, series: &Series) -> bool;
    /// `fresh` starts a new search; otherwise the next page is appended.
    /// Returns whether a page is now being fetched.
    fn handle_search(&self, fresh: bool) -> bool;
    fn search_extension(&self) -> ExtensionId;
    fn update_add_modal(&self, f: impl FnOnce(&mut AddModalState));
}

impl SearchGridHost for Logic {
    fn in_library(&self, series: &Series) -> bool {
        Logic::in_library(self, series)
    }

    fn handle_search(&self, fresh: bool) -> bool {
        Logic::handle_search(self, fresh)
    }

    fn search_extension(&self) -> ExtensionId {
        self.get_search_extension()
    }

    fn update_add_modal(&self, f: impl FnOnce(&mut AddModalState)) {
        Logic::update_add_modal(self, f)
    }
}

/// Number of placeholder tiles shown while a page is loading.
pub fn skeleton_count(columns: u32) -> usize {
    match columns {
        2 => 4,
        4 => 20,
        6 => 24,
        8 => 40,
        _ => DEFAULT_SKELETON_COUNT,
    }
}

/// Height of a tile (or skeleton) for the given viewport width.
pub fn tile_height(viewport_width: f32, columns: u32) -> f32 {
    TILE_HEIGHT_FACTOR * viewport_width / columns.max(1) as f32
}

/// Handles a click on a result tile. Series already in the library are ignored;
/// anything else becomes the add dialog's subject, editable only for the
/// filesystem metadata source.
///
/// Returns whether the add dialog state changed.
pub fn on_tile_clicked(host: &impl SearchGridHost, series: &Series) -> bool {
    if host.in_library(series) {
        return false;
    }

    let editable = host.search_extension() == FS_METADATA;
    let series = series.clone();
    host.update_add_modal(|modal| {
        modal.series = Some(series);
        modal.editable = editable;
        modal.showing = !modal.showing;
    });
    true
}

/// Scroll measurements of the grid's viewport, in the client's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    /// Height of everything inside the viewport, including what is scrolled out.
    pub scroll_height: f32,
    /// Visible height of the viewport.
    pub client_height: f32,
    /// How far the content is scrolled down.
    pub scroll_top: f32,
}
impl ViewportMetrics {
    pub fn distance_from_bottom(&self) -> f32 {
        self.scroll_height - (self.client_height + self.scroll_top)
    }

    /// [`Self::distance_from_bottom`] in viewport heights. A viewport with no
    /// height is never near the bottom.
    pub fn distance_from_bottom_ratio(&self) -> f32 {
        if self.client_height <= 0.0 {
            return f32::INFINITY;
        }
        self.distance_from_bottom() / self.client_height
    }

    pub fn near_bottom(&self) -> bool {
        self.distance_from_bottom_ratio() < SCROLL_FETCH_RATIO
    }
}

/// What the client should do after loading finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSettledAction {
    /// The results are empty; reset the viewport to the top.
    ScrollToTop,
    /// The results don't fill the viewport; another page was requested.
    FetchMore,
}

/// Per-view bookkeeping for the search grid.
#[derive(Debug, Default)]
pub struct SearchGridState {
    activated: bool,
    thumbnails_dir: Option<PathBuf>,
    last_loading: Option<bool>,
    last_scroll_top: Option<f32>,
}
impl SearchGridState {
    /// Prepares the thumbnail directory the first time the grid is shown. Returns
    /// true only for that first call; later calls do nothing.
    pub fn activate(&mut self, provider: &dyn ThumbnailsDirProvider) -> bool {
        if self.activated {
            return false;
        }
        self.activated = true;
        self.thumbnails_dir = thumbnails::prepare_thumbnails_dir(provider);
        true
    }

    /// The thumbnail directory, if activation managed to create it.
    pub fn thumbnails_dir(&self) -> Option<&Path> {
        self.thumbnails_dir.as_deref()
    }

    /// Reacts to the loading flag. Only a change of `loading` (or the first
    /// observation) is acted on; changes to the results alone are not. A fetch
    /// the grid starts itself counts as loading, even if the page arrives before
    /// the flag is next observed.
    ///
    /// When loading has just finished: an empty result list asks the client to
    /// scroll to the top, and a grid shorter than its viewport fetches the next
    /// page. Nothing happens without a viewport.
    pub fn observe_loading(
        &mut self,
        host: &impl SearchGridHost,
        loading: bool,
        series_count: usize,
        viewport: Option<ViewportMetrics>,
        grid_height: Option<f32>,
    ) -> Option<LoadSettledAction> {
        if self.last_loading == Some(loading) {
            return None;
        }
        self.last_loading = Some(loading);

        if loading {
            return None;
        }
        let viewport = viewport?;
        if series_count == 0 {
            return Some(LoadSettledAction::ScrollToTop);
        }
        let grid_height = grid_height?;
        if grid_height < viewport.client_height && self.start_next_page(host) {
            return Some(LoadSettledAction::FetchMore);
        }
        None
    }

    /// Feeds the viewport's current measurements in every frame, calling
    /// [`Self::on_scroll`] when the scroll position moved since the last frame.
    pub fn observe_scroll(
        &mut self,
        host: &impl SearchGridHost,
        viewport: Option<ViewportMetrics>,
        has_more: bool,
    ) -> bool {
        let scroll_top = viewport.map(|v| v.scroll_top);
        let previous = std::mem::replace(&mut self.last_scroll_top, scroll_top);
        if previous.is_none() || previous == scroll_top {
            return false;
        }
        self.on_scroll(host, viewport, has_more)
    }

    /// Handles a scroll position change. Requests the next page when close enough
    /// to the bottom; returns whether a fetch started.
    pub fn on_scroll(
        &mut self,
        host: &impl SearchGridHost,
        viewport: Option<ViewportMetrics>,
        has_more: bool,
    ) -> bool {
        Self::should_fetch_on_scroll(viewport, has_more) && self.start_next_page(host)
    }

    fn should_fetch_on_scroll(viewport: Option<ViewportMetrics>, has_more: bool) -> bool {
        let Some(viewport) = viewport else {
            return false;
        };
        has_more && viewport.near_bottom()
    }

    fn start_next_page(&mut self, host: &impl SearchGridHost) -> bool {
        if !host.handle_search(false) {
            return false;
        }
        self.last_loading = Some(true);
        true
    }
}
