//! Status bar along the bottom edge

use egui::RichText;

use crate::ui::state::WindowState;
use crate::ui::theme::{Palette, ThemeColors};

/// Render the latest status message and the number of pending requests
pub fn render_status_bar(ui: &mut egui::Ui, state: &WindowState) {
    let palette = Palette::for_mode(state.dark_mode());

    ui.horizontal(|ui| {
        ui.label(RichText::new(state.status()).size(12.0).color(palette.text));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let pending = state.in_flight();
            if pending > 0 {
                ui.spinner();
                ui.label(
                    RichText::new(format!("{} request(s) in flight", pending))
                        .size(12.0)
                        .color(ThemeColors::ACCENT_PRIMARY),
                );
            }
        });
    });
}
