//! Window panels

pub mod image_panel;
pub mod results_panel;

pub use image_panel::{render_image_panel, PreviewTexture};
pub use results_panel::render_results_panel;
