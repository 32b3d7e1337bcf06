//! Reusable UI components for the window

pub mod modal;
pub mod status_bar;

pub use modal::render_modal;
pub use status_bar::render_status_bar;
