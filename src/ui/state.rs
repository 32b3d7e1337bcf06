//! Window state
//!
//! Everything the window shows lives here and is only touched from the UI
//! thread. Views read it and queue [`UserAction`]s; task events are applied
//! through [`WindowState::handle_event`].

use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisTask, TaskEvent, TaskEventKind};
use crate::compose::{self, ComposeError, ComposeOptions};
use crate::config::{AppConfig, MAX_FONT_SIZE, MIN_FONT_SIZE};

/// Input problems reported as warnings; the requested operation is skipped
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Please select an image first.")]
    NoImage,
    #[error("No results to export.")]
    NoResults,
    #[error("Please select an image and perform analysis first.")]
    NothingToSave,
}

/// Failures of window operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error("Failed to read image: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// Actions queued by the views and processed once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    SelectImage,
    SaveImageWithAnalysis,
    Identify,
    SelectHistory(usize),
    ClearHistory,
    ExportResults,
    SetFontSize(u32),
    ToggleDarkMode,
}

/// Severity of a modal dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Warning,
    Error,
}

/// A blocking message shown over the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub message: String,
}

/// The currently selected image
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    /// Pixels scaled into the preview box
    pub preview: RgbaImage,
    /// Bumped on every load so the view knows to re-upload the texture
    pub generation: u64,
}

/// State owned by the main window
#[derive(Debug)]
pub struct WindowState {
    endpoint: String,
    default_prompt: String,
    compose_options: ComposeOptions,
    /// Text of the prompt field
    pub prompt: String,
    image: Option<LoadedImage>,
    generation: u64,
    result_text: String,
    history: Vec<String>,
    selected_history: Option<usize>,
    progress: u8,
    status: String,
    in_flight: usize,
    font_size: u32,
    dark_mode: bool,
    modal: Option<Modal>,
}

impl WindowState {
    pub fn new(config: &AppConfig, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            default_prompt: config.ui.default_prompt.clone(),
            compose_options: ComposeOptions {
                box_size: config.ui.preview_size,
                ..ComposeOptions::default()
            },
            prompt: String::new(),
            image: None,
            generation: 0,
            result_text: String::new(),
            history: Vec::new(),
            selected_history: None,
            progress: 0,
            status: "Ready".to_string(),
            in_flight: 0,
            font_size: config.ui.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            dark_mode: config.ui.dark_mode,
            modal: None,
        }
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn selected_history(&self) -> Option<usize> {
        self.selected_history
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Number of submitted tasks that have not reported a terminal event
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Edge length of the square the preview is fitted into
    pub fn preview_size(&self) -> u32 {
        self.compose_options.box_size
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn dismiss_modal(&mut self) {
        self.modal = None;
    }

    /// Show a warning for rejected user input
    pub fn warn(&mut self, err: UserError) {
        debug!("User warning: {}", err);
        self.modal = Some(Modal {
            kind: ModalKind::Warning,
            message: err.to_string(),
        });
    }

    /// Show an error dialog
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.modal = Some(Modal {
            kind: ModalKind::Error,
            message: message.into(),
        });
    }

    /// Show the outcome of a failed operation with the matching dialog
    pub fn report(&mut self, err: StateError) {
        match err {
            StateError::User(user) => self.warn(user),
            other => {
                warn!("{}", other);
                self.report_error(other.to_string());
            }
        }
    }

    /// Replace the current image; on failure the previous image is kept
    pub fn load_image(&mut self, path: &Path) -> Result<(), StateError> {
        let bytes = std::fs::read(path)?;
        let preview = compose::fit_to_box(&bytes, self.compose_options.box_size)?;

        self.generation += 1;
        info!("Loaded image {:?} ({} bytes)", path, bytes.len());
        self.image = Some(LoadedImage {
            path: path.to_path_buf(),
            bytes,
            preview,
            generation: self.generation,
        });
        self.status = "Image loaded successfully".to_string();
        Ok(())
    }

    /// Prepare a task for the current image and prompt
    pub fn begin_identification(&mut self) -> Result<AnalysisTask, UserError> {
        let image = self.image.as_ref().ok_or(UserError::NoImage)?;

        let prompt = if self.prompt.trim().is_empty() {
            self.default_prompt.clone()
        } else {
            self.prompt.clone()
        };
        let task = AnalysisTask::new(self.endpoint.clone(), image.bytes.clone(), prompt);

        self.status = "Processing...".to_string();
        self.progress = 0;
        self.in_flight += 1;
        Ok(task)
    }

    /// Apply an event delivered from a worker
    pub fn handle_event(&mut self, event: TaskEvent) {
        match event.kind {
            TaskEventKind::Progress(value) => {
                self.progress = value.min(100);
            }
            TaskEventKind::Result(text) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.result_text = text.clone();
                self.status = "Image identified successfully".to_string();
                self.add_to_history(text);
                self.progress = 100;
            }
            TaskEventKind::Error(message) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.report_error(message);
                self.status = "Failed to identify image".to_string();
                self.progress = 0;
            }
        }
    }

    fn add_to_history(&mut self, text: String) {
        self.history.push(text);
        debug!("History now holds {} analyses", self.history.len());
    }

    /// Redisplay a past analysis; out of range positions are ignored
    pub fn select_history(&mut self, index: usize) -> bool {
        match self.history.get(index) {
            Some(text) => {
                self.result_text = text.clone();
                self.selected_history = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.selected_history = None;
        self.result_text.clear();
        self.status = "History cleared".to_string();
    }

    pub fn ensure_exportable(&self) -> Result<(), UserError> {
        if self.history.is_empty() {
            Err(UserError::NoResults)
        } else {
            Ok(())
        }
    }

    pub fn export_history(&mut self, path: &Path) -> Result<(), StateError> {
        self.ensure_exportable()?;
        compose::export_history(&self.history, path)?;
        self.status = format!("Results exported to {}", path.display());
        Ok(())
    }

    pub fn ensure_composable(&self) -> Result<(), UserError> {
        if self.image.is_none() || self.result_text.is_empty() {
            Err(UserError::NothingToSave)
        } else {
            Ok(())
        }
    }

    /// Write the preview image with the displayed result drawn on it
    pub fn save_image_with_analysis(&mut self, path: &Path) -> Result<PathBuf, StateError> {
        self.ensure_composable()?;
        let image = self.image.as_ref().ok_or(UserError::NothingToSave)?;

        let written = compose::save_image_with_text(
            &image.bytes,
            &self.result_text,
            &self.compose_options,
            path,
        )?;
        self.status = format!("Image saved with analysis to {}", written.display());
        Ok(written)
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::tests::png_bytes;
    use tempfile::TempDir;

    fn state() -> WindowState {
        WindowState::new(&AppConfig::default(), "http://localhost/generate")
    }

    fn state_with_image(dir: &TempDir) -> WindowState {
        let path = dir.path().join("photo.png");
        std::fs::write(&path, png_bytes(64, 32)).unwrap();
        let mut state = state();
        state.load_image(&path).unwrap();
        state
    }

    fn result(task_id: u64, text: &str) -> TaskEvent {
        TaskEvent {
            task_id,
            kind: TaskEventKind::Result(text.to_string()),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.status(), "Ready");
        assert_eq!(state.progress(), 0);
        assert!(state.image().is_none());
        assert!(state.history().is_empty());
        assert_eq!(state.font_size(), 12);
        assert_eq!(state.preview_size(), 400);
        assert!(!state.dark_mode());
    }

    #[test]
    fn test_identify_without_image_is_rejected() {
        let mut state = state();
        assert_eq!(state.begin_identification().unwrap_err(), UserError::NoImage);
        assert_eq!(state.in_flight(), 0);
        assert_eq!(state.status(), "Ready");
    }

    #[test]
    fn test_load_image_replaces_previous() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_image(&dir);
        let first = state.image().unwrap().generation;
        assert_eq!(state.status(), "Image loaded successfully");
        assert_eq!(state.image().unwrap().preview.dimensions(), (400, 200));

        let other = dir.path().join("other.png");
        std::fs::write(&other, png_bytes(10, 10)).unwrap();
        state.load_image(&other).unwrap();

        let image = state.image().unwrap();
        assert_eq!(image.path, other);
        assert!(image.generation > first);
    }

    #[test]
    fn test_failed_load_keeps_previous_image() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_image(&dir);

        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"garbage").unwrap();
        assert!(matches!(state.load_image(&broken), Err(StateError::Compose(_))));
        assert!(matches!(
            state.load_image(&dir.path().join("missing.png")),
            Err(StateError::Read(_))
        ));

        assert!(state.image().unwrap().path.ends_with("photo.png"));
    }

    #[test]
    fn test_begin_identification_builds_task() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_image(&dir);
        state.prompt = "Is there a cat?".to_string();

        let task = state.begin_identification().unwrap();
        assert_eq!(task.prompt(), "Is there a cat?");
        assert_eq!(task.image(), png_bytes(64, 32).as_slice());
        assert_eq!(state.status(), "Processing...");
        assert_eq!(state.in_flight(), 1);

        state.prompt.clear();
        let task = state.begin_identification().unwrap();
        assert_eq!(task.prompt(), crate::config::DEFAULT_PROMPT);
        assert_eq!(state.in_flight(), 2);
    }

    #[test]
    fn test_success_appends_history_and_displays() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_image(&dir);
        state.begin_identification().unwrap();

        state.handle_event(TaskEvent { task_id: 1, kind: TaskEventKind::Progress(50) });
        assert_eq!(state.progress(), 50);

        state.handle_event(result(1, "A sailing boat"));
        assert_eq!(state.history(), ["A sailing boat".to_string()]);
        assert_eq!(state.result_text(), "A sailing boat");
        assert_eq!(state.status(), "Image identified successfully");
        assert_eq!(state.progress(), 100);
        assert_eq!(state.in_flight(), 0);
        assert!(state.modal().is_none());
    }

    #[test]
    fn test_error_does_not_touch_history() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_image(&dir);
        state.begin_identification().unwrap();

        state.handle_event(TaskEvent { task_id: 1, kind: TaskEventKind::Progress(100) });
        state.handle_event(TaskEvent {
            task_id: 1,
            kind: TaskEventKind::Error("API request failed with status code: 404".into()),
        });

        assert!(state.history().is_empty());
        assert_eq!(state.progress(), 0);
        assert_eq!(state.status(), "Failed to identify image");
        let modal = state.modal().unwrap();
        assert_eq!(modal.kind, ModalKind::Error);
        assert!(modal.message.contains("404"));

        state.dismiss_modal();
        assert!(state.modal().is_none());
    }

    #[test]
    fn test_select_history() {
        let mut state = state();
        for text in ["A", "B", "C"] {
            state.handle_event(result(1, text));
        }

        assert!(state.select_history(1));
        assert_eq!(state.result_text(), "B");
        assert_eq!(state.selected_history(), Some(1));

        assert!(state.select_history(0));
        assert_eq!(state.result_text(), "A");

        assert!(!state.select_history(3));
        assert_eq!(state.result_text(), "A");
    }

    #[test]
    fn test_clear_history() {
        let mut state = state();
        state.handle_event(result(1, "A"));
        state.handle_event(result(2, "B"));

        state.clear_history();
        assert!(state.history().is_empty());
        assert_eq!(state.result_text(), "");
        assert_eq!(state.selected_history(), None);
        assert_eq!(state.status(), "History cleared");
    }

    #[test]
    fn test_export_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.txt");
        let mut state = state();

        assert!(matches!(
            state.export_history(&path),
            Err(StateError::User(UserError::NoResults))
        ));
        assert!(!path.exists());

        state.handle_event(result(1, "A"));
        state.handle_event(result(2, "B"));
        state.export_history(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Analysis 1:\nA\n\nAnalysis 2:\nB\n\n"
        );
        assert!(state.status().starts_with("Results exported to"));
    }

    #[test]
    fn test_save_requires_image_and_result() {
        let dir = TempDir::new().unwrap();
        let mut state = state();
        assert_eq!(state.ensure_composable(), Err(UserError::NothingToSave));

        let mut state_img = state_with_image(&dir);
        assert_eq!(state_img.ensure_composable(), Err(UserError::NothingToSave));

        state_img.handle_event(result(1, "A tree"));
        let written = state_img
            .save_image_with_analysis(&dir.path().join("annotated.png"))
            .unwrap();
        assert!(written.exists());

        state.handle_event(result(1, "text only"));
        assert!(state
            .save_image_with_analysis(&dir.path().join("nope.png"))
            .is_err());
    }

    #[test]
    fn test_report_routes_by_kind() {
        let mut state = state();
        state.report(StateError::User(UserError::NoResults));
        assert_eq!(state.modal().unwrap().kind, ModalKind::Warning);
        assert_eq!(state.modal().unwrap().message, "No results to export.");

        state.report(StateError::Read(std::io::Error::other("disk on fire")));
        assert_eq!(state.modal().unwrap().kind, ModalKind::Error);
    }

    #[test]
    fn test_font_size_and_theme() {
        let mut state = state();
        state.set_font_size(18);
        assert_eq!(state.font_size(), 18);
        state.set_font_size(99);
        assert_eq!(state.font_size(), MAX_FONT_SIZE);
        state.set_font_size(1);
        assert_eq!(state.font_size(), MIN_FONT_SIZE);

        state.toggle_dark_mode();
        assert!(state.dark_mode());
        state.toggle_dark_mode();
        assert!(!state.dark_mode());
    }
}
