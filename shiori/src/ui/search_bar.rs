use egui::{ComboBox, Key, TextEdit, Ui};
use shiori_client_shared::LIBRARY_COLUMN_CHOICES;
use shiori_core::{Logic, shiori_state::ExtensionId};

use crate::ui::style::{Style, StyleExt};

#[derive(Default)]
pub struct SearchBarState {
    pub(crate) query: String,
}

/// Changes that also need to be written to the config.
pub enum SearchBarAction {
    SetExtension(ExtensionId),
    SetColumns(u32),
}

pub fn ui(
    ui: &mut Ui,
    logic: &Logic,
    style: &Style,
    state: &mut SearchBarState,
) -> Option<SearchBarAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        let current_extension = logic.get_search_extension();
        ComboBox::from_id_salt("search_extension")
            .selected_text(current_extension.as_str())
            .show_ui(ui, |ui| {
                for extension_id in logic.get_source_ids() {
                    let selected = extension_id == current_extension;
                    if ui
                        .selectable_label(selected, extension_id.as_str())
                        .clicked()
                        && !selected
                    {
                        action = Some(SearchBarAction::SetExtension(extension_id));
                    }
                }
            });

        let columns = logic.get_library_columns();
        ComboBox::from_id_salt("library_columns")
            .selected_text(format!("{} {columns}", egui_phosphor::regular::SQUARES_FOUR))
            .show_ui(ui, |ui| {
                for choice in LIBRARY_COLUMN_CHOICES {
                    if ui
                        .selectable_label(choice == columns, choice.to_string())
                        .clicked()
                        && choice != columns
                    {
                        action = Some(SearchBarAction::SetColumns(choice));
                    }
                }
            });

        let search_clicked = ui
            .button(egui_phosphor::regular::MAGNIFYING_GLASS)
            .on_hover_text("Search")
            .clicked();

        let response = ui.add(
            TextEdit::singleline(&mut state.query)
                .hint_text("Search series...")
                .text_color(style.text_color32())
                .desired_width(f32::INFINITY),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

        if submitted || search_clicked {
            logic.set_query(&state.query);
            logic.handle_search(true);
        }
    });

    action
}
