//! Window UI Module
//!
//! The main window: image preview and prompt on the left, analysis text and
//! history on the right, status bar at the bottom.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::run;
