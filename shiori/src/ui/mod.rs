mod add_modal;
mod search_bar;
mod search_grid;
mod style;

pub use style::{Style, StyleExt};

use egui::{CentralPanel, Context, FontDefinitions, Frame, Margin, RichText, TopBottomPanel, Visuals};

use crate::{App, config::Config};

#[derive(Default)]
pub struct UiState {
    pub search_bar: search_bar::SearchBarState,
    pub search_grid: search_grid::SearchGridView,
}

pub fn initialize(cc: &eframe::CreationContext<'_>, config: &Config) -> UiState {
    cc.egui_ctx.set_visuals(Visuals::dark());
    cc.egui_ctx.style_mut(|style| {
        style.visuals.panel_fill = config.style.background_color32();
        style.visuals.override_text_color = Some(config.style.text_color32());
        style.scroll_animation = egui::style::ScrollAnimation::duration(0.2);
    });
    cc.egui_ctx.options_mut(|options| {
        options.input_options.line_scroll_speed = config.style.scroll_multiplier
    });

    let mut fonts = FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    cc.egui_ctx.set_fonts(fonts);

    egui_extras::install_image_loaders(&cc.egui_ctx);

    UiState::default()
}

impl App {
    pub fn render(&mut self, ctx: &Context) {
        let logic = &self.logic;

        if let Some(error) = logic.get_error() {
            let mut open = true;
            egui::Window::new("Error").open(&mut open).show(ctx, |ui| {
                ui.label(RichText::new(error.display_name()).heading());
                ui.label(RichText::new(error.display_message()));
            });
            if !open {
                logic.clear_error();
            }
        }

        let margin = 8;
        let action = {
            let config = self.config.read().unwrap();

            let action = TopBottomPanel::top("search_bar")
                .frame(
                    Frame::default()
                        .inner_margin(Margin::same(margin))
                        .fill(config.style.background_color32()),
                )
                .show(ctx, |ui| {
                    search_bar::ui(ui, logic, &config.style, &mut self.ui_state.search_bar)
                })
                .inner;

            CentralPanel::default()
                .frame(
                    Frame::default()
                        .inner_margin(Margin::same(margin))
                        .fill(config.style.background_color32()),
                )
                .show(ctx, |ui| {
                    search_grid::ui(
                        ui,
                        logic,
                        &config.style,
                        &self.thumbnails_dir,
                        &mut self.thumbnail_cache,
                        &mut self.ui_state.search_grid,
                    );
                });

            add_modal::ui(ctx, logic, &config.style, &mut self.thumbnail_cache);

            action
        };

        if let Some(action) = action {
            self.apply_search_bar_action(action);
        }
    }

    fn apply_search_bar_action(&mut self, action: search_bar::SearchBarAction) {
        let mut config = self.config.write().unwrap();
        match action {
            search_bar::SearchBarAction::SetColumns(columns) => {
                self.logic.set_library_columns(columns);
                config.general.library_columns = columns;
            }
            search_bar::SearchBarAction::SetExtension(extension_id) => {
                self.logic.set_search_extension(extension_id.clone());
                self.logic.handle_search(true);
                config.search.extension = extension_id;
            }
        }
        if let Err(e) = config.save() {
            tracing::warn!("failed to save config: {e}");
        }
    }
}
