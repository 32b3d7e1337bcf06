//! Window theme and styling
//!
//! Light and dark presentation modes. Switching restyles every widget.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Theme, Visuals};

/// Colors shared by both modes
pub struct ThemeColors;

impl ThemeColors {
    // Accent colors
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(76, 175, 80);
    pub const ACCENT_HOVER: Color32 = Color32::from_rgb(69, 160, 73);
    pub const ACCENT_WARNING: Color32 = Color32::from_rgb(255, 193, 7);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(231, 76, 60);

    pub const BUTTON_TEXT: Color32 = Color32::WHITE;
}

/// Background, text and border colors of one presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub window_bg: Color32,
    pub field_bg: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub border: Color32,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        window_bg: Color32::from_rgb(240, 240, 240),
        field_bg: Color32::from_rgb(255, 255, 255),
        text: Color32::from_rgb(0, 0, 0),
        text_muted: Color32::from_rgb(96, 96, 96),
        border: Color32::from_rgb(220, 220, 220),
    };

    pub const DARK: Palette = Palette {
        window_bg: Color32::from_rgb(45, 45, 45),
        field_bg: Color32::from_rgb(60, 60, 60),
        text: Color32::from_rgb(240, 240, 240),
        text_muted: Color32::from_rgb(170, 170, 170),
        border: Color32::from_rgb(102, 102, 102),
    };

    pub fn for_mode(dark_mode: bool) -> Palette {
        if dark_mode {
            Palette::DARK
        } else {
            Palette::LIGHT
        }
    }
}

/// Apply the light or dark theme to egui
pub fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    let palette = Palette::for_mode(dark_mode);
    ctx.set_theme(if dark_mode { Theme::Dark } else { Theme::Light });
    let mut style = (*ctx.style()).clone();

    let mut visuals = if dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    visuals.window_fill = palette.window_bg;
    visuals.panel_fill = palette.window_bg;
    visuals.faint_bg_color = palette.field_bg;
    visuals.extreme_bg_color = palette.field_bg;

    // Text fields and lists
    visuals.widgets.noninteractive.bg_fill = palette.window_bg;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, palette.border);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    // Buttons: green with white text in both modes
    visuals.widgets.inactive.weak_bg_fill = ThemeColors::ACCENT_PRIMARY;
    visuals.widgets.inactive.bg_fill = ThemeColors::ACCENT_PRIMARY;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, ThemeColors::BUTTON_TEXT);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.weak_bg_fill = ThemeColors::ACCENT_HOVER;
    visuals.widgets.hovered.bg_fill = ThemeColors::ACCENT_HOVER;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, ThemeColors::BUTTON_TEXT);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.weak_bg_fill = ThemeColors::ACCENT_HOVER;
    visuals.widgets.active.bg_fill = ThemeColors::ACCENT_HOVER;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, ThemeColors::BUTTON_TEXT);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 96);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, palette.border);
    visuals.menu_rounding = Rounding::same(4.0);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(16.0, 8.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_for_mode() {
        assert_eq!(Palette::for_mode(true), Palette::DARK);
        assert_eq!(Palette::for_mode(false), Palette::LIGHT);
        assert_ne!(Palette::DARK.window_bg, Palette::LIGHT.window_bg);
    }

    #[test]
    fn test_apply_theme_switches_visuals() {
        let ctx = egui::Context::default();

        apply_theme(&ctx, true);
        assert!(ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.panel_fill, Palette::DARK.window_bg);

        apply_theme(&ctx, false);
        assert!(!ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.panel_fill, Palette::LIGHT.window_bg);
    }
}
