//! Modal warning and error dialogs

use egui::{Align2, RichText};

use crate::ui::state::{ModalKind, WindowState};
use crate::ui::theme::{Palette, ThemeColors};

/// Show the pending modal, if any, until the user dismisses it
pub fn render_modal(ctx: &egui::Context, state: &mut WindowState) {
    let Some(modal) = state.modal().cloned() else {
        return;
    };

    let palette = Palette::for_mode(state.dark_mode());
    let (title, accent) = match modal.kind {
        ModalKind::Warning => ("Warning", ThemeColors::ACCENT_WARNING),
        ModalKind::Error => ("Error", ThemeColors::ACCENT_ERROR),
    };

    // Dim and block the rest of the window
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("modal_backdrop"))
        .fixed_pos(screen.min)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            ui.allocate_response(screen.size(), egui::Sense::click());
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(96));
        });

    let mut dismissed = false;
    egui::Window::new(RichText::new(title).color(accent).strong())
        .id(egui::Id::new("modal_dialog"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.label(RichText::new(&modal.message).color(palette.text));
            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter)) {
        state.dismiss_modal();
    }
}
