//! Left panel - image preview, prompt and identify controls

use egui::{Align, Layout, ProgressBar, RichText, Rounding, Stroke, Vec2};

use crate::ui::state::{UserAction, WindowState};
use crate::ui::theme::Palette;

/// Uploaded preview texture, tagged with the image generation it shows
pub struct PreviewTexture {
    generation: u64,
    handle: egui::TextureHandle,
}

/// Return the texture for the current image, uploading it when the image changed
fn preview_texture<'a>(
    ctx: &egui::Context,
    state: &WindowState,
    cache: &'a mut Option<PreviewTexture>,
) -> Option<&'a egui::TextureHandle> {
    let image = state.image()?;

    let stale = cache
        .as_ref()
        .map_or(true, |texture| texture.generation != image.generation);
    if stale {
        let size = [image.preview.width() as usize, image.preview.height() as usize];
        let pixels = egui::ColorImage::from_rgba_unmultiplied(size, image.preview.as_raw());
        let handle = ctx.load_texture("preview", pixels, egui::TextureOptions::LINEAR);
        *cache = Some(PreviewTexture {
            generation: image.generation,
            handle,
        });
    }

    cache.as_ref().map(|texture| &texture.handle)
}

/// Render the image panel
pub fn render_image_panel(
    ui: &mut egui::Ui,
    state: &mut WindowState,
    texture: &mut Option<PreviewTexture>,
    actions: &mut Vec<UserAction>,
) {
    let palette = Palette::for_mode(state.dark_mode());
    let box_size = Vec2::splat(state.preview_size() as f32);

    egui::Frame::none()
        .stroke(Stroke::new(2.0, palette.border))
        .rounding(Rounding::same(8.0))
        .show(ui, |ui| {
            ui.set_min_size(box_size);
            ui.with_layout(Layout::centered_and_justified(egui::Direction::TopDown), |ui| {
                match preview_texture(ui.ctx(), state, texture) {
                    Some(handle) => {
                        ui.add(egui::Image::new(handle).max_size(box_size));
                    }
                    None => {
                        ui.label(RichText::new("No image selected").color(palette.text_muted));
                    }
                }
            });
        });

    if let Some(name) = state.image().and_then(|image| image.path.file_name()) {
        ui.add_space(4.0);
        ui.label(
            RichText::new(name.to_string_lossy())
                .size(12.0)
                .color(palette.text_muted),
        );
    }

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui.button("Select Image").clicked() {
            actions.push(UserAction::SelectImage);
        }
        if ui.button("Save Image with Analysis").clicked() {
            actions.push(UserAction::SaveImageWithAnalysis);
        }
    });

    ui.add_space(8.0);

    ui.add(
        egui::TextEdit::singleline(&mut state.prompt)
            .hint_text("Enter custom prompt here")
            .text_color(palette.text)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(8.0);

    ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
        if ui.button("Identify Image").clicked() {
            actions.push(UserAction::Identify);
        }
    });

    ui.add_space(8.0);

    let progress = state.progress();
    ui.add(
        ProgressBar::new(progress as f32 / 100.0)
            .text(format!("{}%", progress))
            .desired_width(f32::INFINITY),
    );
}
