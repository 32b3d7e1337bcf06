//! Export and Composition
//!
//! Writes the analysis history as plain text and renders the current
//! description onto the preview image.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from exporting or composing
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to load overlay font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
}

/// How the description is drawn onto the image
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// The image is scaled to fit a square of this size
    pub box_size: u32,
    /// Text height in pixels
    pub font_px: f32,
    /// Distance between text and image edges
    pub margin: u32,
    pub color: Rgba<u8>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            box_size: 400,
            font_px: 20.0,
            margin: 4,
            color: Rgba([0, 0, 0, 255]),
        }
    }
}

/// Render the history in the export format
pub fn format_history(entries: &[String]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, text)| format!("Analysis {}:\n{}\n\n", i + 1, text))
        .collect()
}

/// Write the history to a text file
pub fn export_history(entries: &[String], path: &Path) -> Result<(), ComposeError> {
    std::fs::write(path, format_history(entries))?;
    info!("Exported {} analyses to {:?}", entries.len(), path);
    Ok(())
}

/// Decode image bytes and scale them into a `box_size` square, keeping aspect ratio
pub fn fit_to_box(image_bytes: &[u8], box_size: u32) -> Result<RgbaImage, ComposeError> {
    let source = image::load_from_memory(image_bytes)?;
    let box_size = box_size.max(1);
    Ok(source.resize(box_size, box_size, FilterType::Lanczos3).to_rgba8())
}

/// Greedy word wrap; words wider than `max_width` get a line of their own
pub fn wrap_text<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    lines
}

/// Draw `text` anchored to the bottom-left corner of the scaled image
pub fn compose_image_with_text(
    image_bytes: &[u8],
    text: &str,
    options: &ComposeOptions,
) -> Result<RgbaImage, ComposeError> {
    let mut canvas = fit_to_box(image_bytes, options.box_size)?;
    let font = FontRef::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)?;
    let scale = PxScale::from(options.font_px);

    let max_width = canvas.width().saturating_sub(options.margin * 2);
    let lines = wrap_text(text, max_width, |s| text_size(scale, &font, s).0);
    let line_height = font.as_scaled(scale).height().ceil() as i32;

    // Lines that do not fit are clipped at the top edge
    let margin = options.margin as i32;
    let mut y = canvas.height() as i32 - margin - line_height * lines.len() as i32;
    for line in &lines {
        draw_text_mut(&mut canvas, options.color, margin, y, scale, &font, line);
        y += line_height;
    }

    debug!(
        "Composed {}x{} image with {} text lines",
        canvas.width(),
        canvas.height(),
        lines.len()
    );
    Ok(canvas)
}

/// Compose and save; a path without extension is saved as PNG.
/// Returns the path actually written.
pub fn save_image_with_text(
    image_bytes: &[u8],
    text: &str,
    options: &ComposeOptions,
    path: &Path,
) -> Result<PathBuf, ComposeError> {
    let path = if path.extension().is_none() {
        path.with_extension("png")
    } else {
        path.to_path_buf()
    };

    let format = ImageFormat::from_path(&path)?;
    let composed = DynamicImage::ImageRgba8(compose_image_with_text(image_bytes, text, options)?);

    match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => composed.to_rgb8().save_with_format(&path, format)?,
        _ => composed.save_with_format(&path, format)?,
    }

    info!("Saved image with analysis to {:?}", path);
    Ok(path)
}
