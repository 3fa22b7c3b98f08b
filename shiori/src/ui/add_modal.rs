use egui::{Align2, Context, RichText};
use shiori_core::{AddModalState, Logic};

use crate::{
    thumbnail_cache::ThumbnailCache,
    ui::style::{Style, StyleExt},
};

const COVER_WIDTH: f32 = 160.0;

pub fn ui(ctx: &Context, logic: &Logic, style: &Style, thumbnail_cache: &mut ThumbnailCache) {
    let modal = logic.get_add_modal();
    if !modal.showing {
        return;
    }
    let Some(series) = modal.series else {
        return;
    };

    let mut open = true;
    let mut add = false;
    let mut cancel = false;
    egui::Window::new("Add series")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal_top(|ui| {
                if let Some(thumbnail) = thumbnail_cache.get(logic, &series) {
                    ui.add(egui::Image::new(thumbnail.image_source()).max_width(COVER_WIDTH));
                }
                ui.vertical(|ui| {
                    ui.set_max_width(COVER_WIDTH * 2.0);
                    ui.label(RichText::new(&series.title).heading());
                    ui.label(RichText::new(series.key().to_string()).weak());
                    if !series.description.is_empty() {
                        ui.add_space(4.0);
                        ui.label(&series.description);
                    }
                    if modal.editable {
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new(format!(
                                "{} Details come from the library folder and can be edited there.",
                                egui_phosphor::regular::PENCIL_SIMPLE
                            ))
                            .color(style.accent_color32()),
                        );
                    }
                });
            });

            ui.separator();
            ui.horizontal(|ui| {
                add = ui
                    .button(format!("{} Add to library", egui_phosphor::regular::PLUS))
                    .clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });

    if add {
        logic.add_to_library(series);
    }
    if add || cancel || !open {
        logic.update_add_modal(AddModalState::close);
    }
}
