//! Main window application

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::analysis::{TaskEvent, WorkerPool};
use crate::config::AppConfig;
use crate::ui::components::{render_modal, render_status_bar};
use crate::ui::state::{UserAction, WindowState};
use crate::ui::theme;
use crate::ui::views::{render_image_panel, render_results_panel, PreviewTexture};

const WINDOW_TITLE: &str = "Advanced Image Identifier";

/// The image identifier window
pub struct IdentifierApp {
    /// Window state, only touched on the UI thread
    state: WindowState,
    /// Background workers running analysis requests
    pool: WorkerPool,
    /// Events coming back from the workers
    events: Receiver<TaskEvent>,
    /// Preview texture cache
    preview: Option<PreviewTexture>,
    /// Theme currently applied to the context
    applied_dark_mode: Option<bool>,
    /// Actions queued by the views this frame
    actions: Vec<UserAction>,
}

impl IdentifierApp {
    /// Create the application with its worker pool
    pub fn new(config: &AppConfig, endpoint: String) -> Result<Self> {
        let (tx, rx) = unbounded();
        let pool = WorkerPool::new(config, tx)?;

        Ok(Self {
            state: WindowState::new(config, endpoint),
            pool,
            events: rx,
            preview: None,
            applied_dark_mode: None,
            actions: Vec::new(),
        })
    }

    /// Load an image before the window opens
    pub fn preload_image(&mut self, path: &std::path::Path) {
        if let Err(e) = self.state.load_image(path) {
            self.state.report(e);
        }
    }

    /// Let workers wake the event loop when they deliver events
    fn attach_context(&mut self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        self.pool.set_waker(Arc::new(move || ctx.request_repaint()));
    }

    /// Create eframe options for the window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([900.0, 600.0])
                .with_title(WINDOW_TITLE),
            ..Default::default()
        }
    }

    /// Apply task events delivered since the last frame
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if event.kind.is_terminal() {
                debug!("Task {} finished", event.task_id);
            }
            self.state.handle_event(event);
        }
    }

    /// Process actions queued by the views
    fn process_actions(&mut self) {
        for action in std::mem::take(&mut self.actions) {
            match action {
                UserAction::SelectImage => self.select_image(),
                UserAction::SaveImageWithAnalysis => self.save_image_with_analysis(),
                UserAction::Identify => self.identify_image(),
                UserAction::SelectHistory(index) => {
                    self.state.select_history(index);
                }
                UserAction::ClearHistory => self.state.clear_history(),
                UserAction::ExportResults => self.export_results(),
                UserAction::SetFontSize(size) => self.state.set_font_size(size),
                UserAction::ToggleDarkMode => self.state.toggle_dark_mode(),
            }
        }
    }

    fn select_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select Image")
            .add_filter("Image Files", &["png", "jpg", "jpeg"])
            .pick_file();

        if let Some(path) = picked {
            if let Err(e) = self.state.load_image(&path) {
                self.state.report(e);
            }
        }
    }

    fn identify_image(&mut self) {
        match self.state.begin_identification() {
            Ok(task) => {
                let task_id = self.pool.submit(task);
                info!("Identification started as task {}", task_id);
            }
            Err(e) => self.state.warn(e),
        }
    }

    fn export_results(&mut self) {
        if let Err(e) = self.state.ensure_exportable() {
            self.state.warn(e);
            return;
        }

        let picked = rfd::FileDialog::new()
            .set_title("Export Results")
            .add_filter("Text Files", &["txt"])
            .save_file();

        if let Some(path) = picked {
            if let Err(e) = self.state.export_history(&path) {
                self.state.report(e);
            }
        }
    }

    fn save_image_with_analysis(&mut self) {
        if let Err(e) = self.state.ensure_composable() {
            self.state.warn(e);
            return;
        }

        let picked: Option<PathBuf> = rfd::FileDialog::new()
            .set_title("Save Image with Analysis")
            .add_filter("Image Files", &["png", "jpg", "jpeg"])
            .save_file();

        if let Some(path) = picked {
            if let Err(e) = self.state.save_image_with_analysis(&path) {
                self.state.report(e);
            }
        }
    }
}

impl eframe::App for IdentifierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Restyle whenever the mode changed
        let dark_mode = self.state.dark_mode();
        if self.applied_dark_mode != Some(dark_mode) {
            theme::apply_theme(ctx, dark_mode);
            self.applied_dark_mode = Some(dark_mode);
        }

        self.drain_events();

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(26.0)
            .show(ctx, |ui| {
                render_status_bar(ui, &self.state);
            });

        egui::SidePanel::left("image_panel")
            .resizable(true)
            .default_width(420.0)
            .min_width(420.0)
            .show(ctx, |ui| {
                egui::Frame::none().inner_margin(8.0).show(ui, |ui| {
                    render_image_panel(ui, &mut self.state, &mut self.preview, &mut self.actions);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none().inner_margin(8.0).show(ui, |ui| {
                render_results_panel(ui, &self.state, &mut self.actions);
            });
        });

        render_modal(ctx, &mut self.state);

        // Input is blocked while a dialog is open
        if self.state.modal().is_some() {
            self.actions.clear();
        }
        self.process_actions();
    }
}

/// Run the window until it is closed
pub fn run(config: AppConfig, endpoint: String, initial_image: Option<PathBuf>) -> Result<()> {
    let mut app = IdentifierApp::new(&config, endpoint)?;
    if let Some(path) = initial_image {
        app.preload_image(&path);
    }

    eframe::run_native(
        WINDOW_TITLE,
        IdentifierApp::options(),
        Box::new(move |cc| {
            app.attach_context(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| {
        error!("Window error: {}", e);
        anyhow::anyhow!("Window error: {}", e)
    })
}
