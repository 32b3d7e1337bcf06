//! Right panel - analysis text, history and display preferences

use egui::{FontId, RichText};

use crate::config::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::ui::state::{UserAction, WindowState};
use crate::ui::theme::Palette;

/// Render the results panel
pub fn render_results_panel(
    ui: &mut egui::Ui,
    state: &WindowState,
    actions: &mut Vec<UserAction>,
) {
    let palette = Palette::for_mode(state.dark_mode());

    ui.label(RichText::new("Text Analysis:").strong());
    ui.add_space(4.0);

    // Half of the remaining height for the result, the rest for history and controls
    let result_height = (ui.available_height() * 0.5).max(120.0);
    egui::ScrollArea::vertical()
        .id_salt("result_text")
        .max_height(result_height)
        .show(ui, |ui| {
            let mut text = state.result_text();
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .font(FontId::proportional(state.font_size() as f32))
                    .text_color(palette.text)
                    .desired_width(f32::INFINITY)
                    .desired_rows(12),
            );
        });

    ui.add_space(12.0);
    ui.label(RichText::new("History:").strong());
    ui.add_space(4.0);

    egui::Frame::none()
        .fill(palette.field_bg)
        .stroke(egui::Stroke::new(1.0, palette.border))
        .rounding(egui::Rounding::same(4.0))
        .inner_margin(6.0)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("history_list")
                .max_height(160.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for index in 0..state.history().len() {
                        let selected = state.selected_history() == Some(index);
                        let label = RichText::new(format!("Analysis {}", index + 1))
                            .color(palette.text);
                        if ui.selectable_label(selected, label).clicked() {
                            actions.push(UserAction::SelectHistory(index));
                        }
                    }
                });
        });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui.button("Clear History").clicked() {
            actions.push(UserAction::ClearHistory);
        }
        if ui.button("Export Results").clicked() {
            actions.push(UserAction::ExportResults);
        }
    });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Font Size:");

        let current = state.font_size();
        egui::ComboBox::from_id_salt("font_size")
            .selected_text(current.to_string())
            .show_ui(ui, |ui| {
                for size in MIN_FONT_SIZE..=MAX_FONT_SIZE {
                    if ui.selectable_label(size == current, size.to_string()).clicked()
                        && size != current
                    {
                        actions.push(UserAction::SetFontSize(size));
                    }
                }
            });

        ui.add_space(16.0);

        let mut dark_mode = state.dark_mode();
        if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
            actions.push(UserAction::ToggleDarkMode);
        }
    });
}
