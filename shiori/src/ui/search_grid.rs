use std::path::Path;

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Mesh, Rect, RichText, ScrollArea, Sense,
    Shape, Ui, pos2,
    text::{LayoutJob, TextFormat, TextWrapping},
    vec2,
};
use shiori_client_shared::{
    search_grid::{self, LoadSettledAction, SearchGridState, ViewportMetrics},
    thumbnails::ThumbnailsDirProvider,
};
use shiori_core::{Logic, shiori_state::Series};

use crate::{
    thumbnail_cache::ThumbnailCache,
    ui::style::{Style, StyleExt},
};

const TILE_SPACING: f32 = 6.0;
const TILE_ROUNDING: u8 = 4;
const TITLE_PADDING: f32 = 4.0;
const TITLE_MAX_ROWS: usize = 3;
/// The dark gradient behind titles covers this much of the tile, from the bottom.
const GRADIENT_FRACTION: f32 = 0.4;
const GRADIENT_ALPHA: u8 = 0xcc;
const IN_LIBRARY_OPACITY: f32 = 0.5;

#[derive(Default)]
pub struct SearchGridView {
    grid: SearchGridState,
    scroll_to_top: bool,
}

/// What was on screen this frame, read under one lock.
struct RenderedGrid {
    series_count: usize,
    has_more: bool,
    clicked: Option<Series>,
}

pub fn ui(
    ui: &mut Ui,
    logic: &Logic,
    style: &Style,
    thumbnails_dir: &dyn ThumbnailsDirProvider,
    thumbnail_cache: &mut ThumbnailCache,
    view: &mut SearchGridView,
) {
    if view.grid.activate(thumbnails_dir) {
        thumbnail_cache.set_cache_dir(view.grid.thumbnails_dir().map(Path::to_path_buf));
    }

    let columns = logic.get_library_columns().max(1);
    let tile_height = search_grid::tile_height(ui.ctx().screen_rect().width(), columns);

    let mut scroll_area = ScrollArea::vertical()
        .id_salt("search_grid")
        .auto_shrink([false, false]);
    if std::mem::take(&mut view.scroll_to_top) {
        scroll_area = scroll_area.vertical_scroll_offset(0.0);
    }

    let state = logic.get_state();
    let output = scroll_area.show(ui, |ui| {
        let state = state.read().unwrap();
        let series_list = &state.search.result.series_list;
        let loading = state.search.loading;

        ui.spacing_mut().item_spacing = vec2(TILE_SPACING, TILE_SPACING);
        let tile_width = ((ui.available_width() - TILE_SPACING * (columns - 1) as f32)
            / columns as f32)
            .max(1.0);
        let tile_size = vec2(tile_width, tile_height);

        let skeletons = if loading {
            search_grid::skeleton_count(columns)
        } else {
            0
        };
        let total = series_list.len() + skeletons;

        if total == 0 {
            ui.label(RichText::new("No series found.").weak());
        }

        let mut clicked = None;
        for row_start in (0..total).step_by(columns as usize) {
            ui.horizontal(|ui| {
                for index in row_start..(row_start + columns as usize).min(total) {
                    let (rect, response) = ui.allocate_exact_size(tile_size, Sense::click());
                    if !ui.is_rect_visible(rect) {
                        continue;
                    }

                    let Some(series) = series_list.get(index) else {
                        render_skeleton(ui, rect, style);
                        continue;
                    };

                    let in_library = state.library.contains(series);
                    render_tile(ui, rect, series, in_library, style, thumbnail_cache, logic);
                    if response.hovered() {
                        ui.ctx().set_cursor_icon(if in_library {
                            CursorIcon::NotAllowed
                        } else {
                            CursorIcon::PointingHand
                        });
                    }
                    if response.clicked() {
                        clicked = Some(series.clone());
                    }
                }
            });
        }

        RenderedGrid {
            series_count: series_list.len(),
            has_more: state.search.result.has_more,
            clicked,
        }
    });

    // The state lock is released; everything below may write to it.
    let rendered = output.inner;
    let viewport = ViewportMetrics {
        scroll_height: output.content_size.y,
        client_height: output.inner_rect.height(),
        scroll_top: output.state.offset.y,
    };

    if let Some(series) = &rendered.clicked {
        search_grid::on_tile_clicked(logic, series);
    }

    // Read the flag again rather than reusing the painted one, so a search started
    // while handling this frame is seen before it can finish.
    if let Some(LoadSettledAction::ScrollToTop) = view.grid.observe_loading(
        logic,
        logic.is_loading(),
        rendered.series_count,
        Some(viewport),
        Some(output.content_size.y),
    ) {
        view.scroll_to_top = true;
        ui.ctx().request_repaint();
    }

    view.grid.observe_scroll(logic, Some(viewport), rendered.has_more);
}

fn render_tile(
    ui: &Ui,
    rect: Rect,
    series: &Series,
    in_library: bool,
    style: &Style,
    thumbnail_cache: &mut ThumbnailCache,
    logic: &Logic,
) {
    let painter = ui.painter_at(rect);
    let rounding = CornerRadius::same(TILE_ROUNDING);
    painter.rect_filled(rect, rounding, style.skeleton_color32());

    if let Some(thumbnail) = thumbnail_cache.get(logic, series) {
        egui::Image::new(thumbnail.image_source())
            .uv(cover_uv(thumbnail.aspect_ratio, rect.aspect_ratio()))
            .corner_radius(rounding)
            .show_loading_spinner(false)
            .paint_at(ui, rect);
    }

    let gradient_top = rect.bottom() - rect.height() * GRADIENT_FRACTION;
    let dark = Color32::from_black_alpha(GRADIENT_ALPHA);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(pos2(rect.left(), gradient_top), Color32::TRANSPARENT);
    mesh.colored_vertex(pos2(rect.right(), gradient_top), Color32::TRANSPARENT);
    mesh.colored_vertex(rect.right_bottom(), dark);
    mesh.colored_vertex(rect.left_bottom(), dark);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));

    if in_library {
        painter.rect_filled(
            rect,
            rounding,
            style.in_library_color32().gamma_multiply(IN_LIBRARY_OPACITY),
        );
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            egui_phosphor::regular::CHECK_CIRCLE,
            FontId::proportional(rect.width() * 0.25),
            Color32::WHITE,
        );
    }

    let mut job = LayoutJob::single_section(
        series.title.clone(),
        TextFormat {
            font_id: FontId::proportional(14.0),
            color: style.tile_title_color32(),
            ..Default::default()
        },
    );
    job.wrap = TextWrapping {
        max_width: (rect.width() - TITLE_PADDING * 2.0).max(1.0),
        max_rows: TITLE_MAX_ROWS,
        break_anywhere: false,
        overflow_character: Some('…'),
    };
    let galley = ui.fonts(|fonts| fonts.layout_job(job));
    let title_pos = pos2(
        rect.left() + TITLE_PADDING,
        rect.bottom() - TITLE_PADDING - galley.size().y,
    );
    painter.galley(title_pos, galley, style.tile_title_color32());
}

fn render_skeleton(ui: &Ui, rect: Rect, style: &Style) {
    let time = ui.input(|i| i.time);
    let pulse = ((time * 2.0).sin() * 0.5 + 0.5) as f32;
    let colour = style
        .skeleton_color32()
        .lerp_to_gamma(style.skeleton_highlight_color32(), pulse);
    ui.painter()
        .rect_filled(rect, CornerRadius::same(TILE_ROUNDING), colour);
    ui.ctx().request_repaint();
}

/// The part of a cover to show so that it fills a tile without stretching,
/// cropping evenly from both sides.
fn cover_uv(image_aspect: Option<f32>, tile_aspect: f32) -> Rect {
    let full = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    let Some(image_aspect) = image_aspect else {
        return full;
    };
    if !(image_aspect.is_finite() && tile_aspect.is_finite() && tile_aspect > 0.0) {
        return full;
    }

    if image_aspect > tile_aspect {
        let visible = tile_aspect / image_aspect;
        let inset = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(inset, 0.0), pos2(1.0 - inset, 1.0))
    } else {
        let visible = image_aspect / tile_aspect;
        let inset = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(0.0, inset), pos2(1.0, 1.0 - inset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_are_cropped_not_stretched() {
        // A square cover in a tile twice as tall as it is wide keeps the middle half.
        let uv = cover_uv(Some(1.0), 0.5);
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!((uv.min.y, uv.max.y), (0.0, 1.0));

        let uv = cover_uv(Some(0.25), 0.5);
        assert!((uv.min.y - 0.25).abs() < 1e-6);
        assert_eq!((uv.min.x, uv.max.x), (0.0, 1.0));

        let full = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        assert_eq!(cover_uv(None, 0.5), full);
        assert_eq!(cover_uv(Some(1.0), f32::NAN), full);
    }
}
