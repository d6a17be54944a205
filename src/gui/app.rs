//! Main application state and GUI logic.
//!
//! This module defines the main application struct and implements the
//! eframe::App trait to provide the core GUI functionality for the
//! annealing run viewer.

use eframe::egui;
use std::path::PathBuf;

use crate::core::config::AppSettings;
use crate::core::error::AppError;
use crate::core::filter::{FilterState, Series};
use crate::core::loader;
use crate::core::playback::{ReplayState, BASE_SAMPLES_PER_SECOND};
use crate::core::run_log::{distance_bounds, iteration_bounds, DistanceGroup, RunSample};

use super::chart::ChartRenderer;
use super::compare::ComparisonRenderer;
use super::controls::{ControlAction, ControlsRenderer};
use super::dialogs::{ErrorDialogAction, ErrorDialogRenderer, ErrorDialogState};

/// Application state indicating the current loading status.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AppState {
    /// No file has been loaded yet (initial state)
    #[default]
    NoFileLoaded,
    /// A file has been successfully loaded and is ready for viewing
    Ready,
    /// Replay is in progress
    Playing,
    /// An error occurred (details live in the error dialog)
    Error,
}

impl AppState {
    /// Returns true if the application is in a state where file operations are allowed.
    pub fn can_open_file(&self) -> bool {
        matches!(
            self,
            AppState::NoFileLoaded | AppState::Ready | AppState::Playing | AppState::Error
        )
    }

    /// Returns true if toolbar controls (ceiling, series filter) should be enabled.
    pub fn toolbar_enabled(&self) -> bool {
        matches!(self, AppState::Ready | AppState::Playing)
    }

    /// Returns true if replay controls should be enabled.
    pub fn controls_enabled(&self) -> bool {
        matches!(self, AppState::Ready | AppState::Playing)
    }

    /// Returns true if replay is currently active.
    pub fn is_playing(&self) -> bool {
        matches!(self, AppState::Playing)
    }
}

/// Which central view is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Single run: stacked distance/temperature charts with replay
    Run,
    /// Distance groups: box plots and summary statistics
    Compare,
}

/// Kind of status message to display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    /// Success message (shown in green)
    Success,
    /// Error message (shown in red)
    Error,
}

/// A status message with its kind and timestamp.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// The message text
    pub text: String,
    /// Kind of message (success/error)
    pub kind: StatusKind,
    /// When the message was created (for auto-dismiss)
    pub created_at: std::time::Instant,
}

impl StatusMessage {
    /// Create a new status message.
    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: std::time::Instant::now(),
        }
    }

    /// Duration to show status messages before auto-dismissing.
    const DISPLAY_DURATION: std::time::Duration = std::time::Duration::from_secs(5);

    /// Check if the message should still be displayed.
    pub fn is_visible(&self) -> bool {
        self.created_at.elapsed() < Self::DISPLAY_DURATION
    }
}

/// Main application state and GUI logic.
pub struct RunViewerApp {
    /// Current application state
    state: AppState,
    /// Which central view is active
    view: ViewMode,
    /// Persistent user settings
    settings: AppSettings,
    /// Loaded run samples (Some when a run log is loaded)
    samples: Option<Vec<RunSample>>,
    /// Path to the currently loaded run log
    loaded_file_path: Option<PathBuf>,
    /// Loaded distance groups for the comparison view
    groups: Vec<DistanceGroup>,
    /// Chart series visibility
    filter: FilterState,
    /// Replay cursor state
    replay: ReplayState,
    /// Whether the distance ceiling filter is active
    ceiling_enabled: bool,
    /// Ceiling value used when the filter is active
    ceiling_value: f64,
    /// Status message to display (success/error notifications)
    status_message: Option<StatusMessage>,
    /// Modal error dialog state
    error_dialog: ErrorDialogState,
    /// Path to re-load when the user picks Retry in the error dialog
    retry_path: Option<PathBuf>,
}

impl RunViewerApp {
    /// Create a new application instance.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();

        let mut replay = ReplayState::new();
        replay.set_speed(settings.get_default_speed());
        replay.loop_enabled = settings.loop_enabled;

        let (ceiling_enabled, ceiling_value) = match settings.default_ceiling {
            Some(c) => (true, c),
            None => (false, 0.0),
        };

        Self {
            state: AppState::NoFileLoaded,
            view: ViewMode::Run,
            settings,
            samples: None,
            loaded_file_path: None,
            groups: Vec::new(),
            filter: FilterState::new(),
            replay,
            ceiling_enabled,
            ceiling_value,
            status_message: None,
            error_dialog: ErrorDialogState::new(),
            retry_path: None,
        }
    }

    /// The ceiling currently applied when loading run logs.
    fn ceiling(&self) -> Option<f64> {
        if self.ceiling_enabled {
            Some(self.ceiling_value)
        } else {
            None
        }
    }

    /// Open a file dialog and load the selected run log.
    fn open_run_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Run logs", &["txt", "log"])
            .set_title("Open Run Log")
            .pick_file()
        {
            self.load_run(path);
        }
    }

    /// Open a multi-select dialog and load distance logs for comparison.
    fn open_compare_dialog(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Distance logs", &["txt", "log"])
            .set_title("Open Distance Logs")
            .pick_files()
        {
            self.load_groups(paths);
        }
    }

    /// Load a run log from the given path with the current ceiling.
    fn load_run(&mut self, path: PathBuf) {
        match loader::load_run_log(&path, self.ceiling()) {
            Ok(samples) => {
                let count = samples.len();
                let span = iteration_bounds(&samples);
                self.samples = Some(samples);
                self.loaded_file_path = Some(path.clone());
                self.state = AppState::Ready;
                self.view = ViewMode::Run;
                self.replay.set_sample(0, count);
                self.replay.go_to_start();

                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "file".to_string());
                let span_text = span
                    .map(|(a, b)| format!(", iterations {}..{}", a, b))
                    .unwrap_or_default();
                self.status_message = Some(StatusMessage::new(
                    format!("Loaded: {} ({} samples{})", name, count, span_text),
                    StatusKind::Success,
                ));

                self.settings.add_recent_file(path);
                self.persist_settings();
            }
            Err(e) => self.show_error(e),
        }
    }

    /// Re-load the current run log, applying the ceiling setting.
    fn reload_current(&mut self) {
        if let Some(path) = self.loaded_file_path.clone() {
            self.load_run(path);
        }
    }

    /// Load distance logs as comparison groups.
    ///
    /// The first failing file aborts the whole operation, matching the
    /// loader's no-partial-results policy.
    fn load_groups(&mut self, paths: Vec<PathBuf>) {
        let mut groups = Vec::with_capacity(paths.len());
        for path in paths {
            match loader::load_distances(&path) {
                Ok(group) => groups.push(group),
                Err(e) => {
                    self.show_error(e);
                    return;
                }
            }
        }

        let count = groups.len();
        self.groups = groups;
        self.view = ViewMode::Compare;
        if self.state == AppState::NoFileLoaded {
            self.state = AppState::Ready;
        }
        self.status_message = Some(StatusMessage::new(
            format!("Loaded {} distance group(s)", count),
            StatusKind::Success,
        ));
    }

    /// Show the error dialog and remember the path for Retry.
    fn show_error(&mut self, error: AppError) {
        self.retry_path = error.file_path().cloned();
        self.status_message = Some(StatusMessage::new(
            error.brief_description(),
            StatusKind::Error,
        ));
        self.error_dialog.show(error);
        self.state = AppState::Error;
    }

    /// Clear error state and return to the appropriate state.
    fn clear_error(&mut self) {
        if self.samples.is_some() || !self.groups.is_empty() {
            self.state = AppState::Ready;
        } else {
            self.state = AppState::NoFileLoaded;
        }
    }

    /// Persist settings, downgrading failures to a status message.
    fn persist_settings(&mut self) {
        self.settings.default_ceiling = self.ceiling();
        self.settings.default_speed = self.replay.speed;
        self.settings.loop_enabled = self.replay.loop_enabled;
        if let Err(reason) = self.settings.save() {
            self.status_message = Some(StatusMessage::new(
                format!("Could not save settings: {}", reason),
                StatusKind::Error,
            ));
        }
    }

    fn total_samples(&self) -> usize {
        self.samples.as_ref().map(|s| s.len()).unwrap_or(0)
    }

    fn current_sample(&self) -> Option<&RunSample> {
        self.samples
            .as_ref()
            .and_then(|s| s.get(self.replay.current_sample))
    }
}

impl eframe::App for RunViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle replay advancement when playing
        if self.state.is_playing() {
            let total = self.total_samples();
            if self.replay.should_advance(BASE_SAMPLES_PER_SECOND) {
                let should_continue = self.replay.advance(total);
                if !should_continue {
                    // Replay ended (loop disabled and reached end)
                    self.state = AppState::Ready;
                }
            }
            // Keep requesting repaints while playing
            ctx.request_repaint();
        }

        // Handle files dropped onto the window
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            match self.view {
                ViewMode::Run => self.load_run(dropped[0].clone()),
                ViewMode::Compare => self.load_groups(dropped),
            }
        }

        // Handle keyboard shortcuts
        if let Some(action) = self.handle_keyboard_shortcuts(ctx) {
            self.handle_control_action(action);
        }

        self.render_toolbar(ctx);
        if self.view == ViewMode::Run {
            self.render_controls(ctx);
        }
        self.render_central(ctx);
        self.render_error_dialog(ctx);
    }
}

impl RunViewerApp {
    /// Handle keyboard shortcuts for replay control.
    ///
    /// Returns an action if a keyboard shortcut was triggered, None otherwise.
    /// Shortcuts only work when a run is loaded (controls_enabled).
    fn handle_keyboard_shortcuts(&self, ctx: &egui::Context) -> Option<ControlAction> {
        if !self.state.controls_enabled() || self.view != ViewMode::Run {
            return None;
        }

        ctx.input(|i| {
            // Space: Toggle play/pause
            if i.key_pressed(egui::Key::Space) {
                return Some(ControlAction::TogglePlayPause);
            }

            // Left Arrow: Previous sample
            if i.key_pressed(egui::Key::ArrowLeft) {
                return Some(ControlAction::PreviousSample);
            }

            // Right Arrow: Next sample
            if i.key_pressed(egui::Key::ArrowRight) {
                return Some(ControlAction::NextSample);
            }

            // Home: Jump to first sample
            if i.key_pressed(egui::Key::Home) {
                return Some(ControlAction::GoToStart);
            }

            // End: Jump to last sample
            if i.key_pressed(egui::Key::End) {
                return Some(ControlAction::GoToEnd);
            }

            // B: Jump to best distance
            if i.key_pressed(egui::Key::B) {
                return Some(ControlAction::GoToBest);
            }

            None
        })
    }

    /// Render the top toolbar section.
    ///
    /// Contains file loading, the ceiling filter, series visibility,
    /// and the view switch.
    fn render_toolbar(&mut self, ctx: &egui::Context) {
        let can_open = self.state.can_open_file();
        let toolbar_enabled = self.state.toolbar_enabled();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Annealing Run Viewer");
                ui.separator();

                ui.add_enabled_ui(can_open, |ui| {
                    if ui.button("📂 Open Run").clicked() {
                        self.open_run_dialog();
                    }
                    if ui.button("📊 Compare…").clicked() {
                        self.open_compare_dialog();
                    }
                });

                self.render_recent_files(ui);

                ui.separator();
                self.render_ceiling_control(ui);

                ui.separator();

                // Series visibility (only meaningful in the run view)
                ui.add_enabled_ui(toolbar_enabled && self.view == ViewMode::Run, |ui| {
                    self.render_series_toggles(ui);
                });

                ui.separator();

                // View switch
                if ui
                    .selectable_label(self.view == ViewMode::Run, "Run")
                    .clicked()
                {
                    self.view = ViewMode::Run;
                }
                if ui
                    .selectable_label(self.view == ViewMode::Compare, "Compare")
                    .clicked()
                {
                    self.view = ViewMode::Compare;
                }

                // Show status message in toolbar (right-aligned)
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_status_message(ui);
                });
            });
        });
    }

    /// Render the recent-files dropdown.
    fn render_recent_files(&mut self, ui: &mut egui::Ui) {
        if self.settings.recent_files.is_empty() {
            return;
        }

        let mut picked: Option<PathBuf> = None;
        egui::ComboBox::from_id_salt("recent_combo")
            .selected_text("Recent")
            .width(80.0)
            .show_ui(ui, |ui| {
                for path in &self.settings.recent_files {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.to_string_lossy().to_string());
                    if ui.selectable_label(false, name).clicked() {
                        picked = Some(path.clone());
                    }
                }
            });

        if let Some(path) = picked {
            self.load_run(path);
        }
    }

    /// Render the ceiling filter control.
    ///
    /// The ceiling is applied at load time, so edits take effect on the
    /// next load; the Reload button re-applies it to the current file.
    fn render_ceiling_control(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;

        if ui
            .checkbox(&mut self.ceiling_enabled, "Ceiling")
            .on_hover_text("Skip samples whose distance exceeds the ceiling")
            .changed()
        {
            if self.ceiling_enabled && self.ceiling_value <= 0.0 {
                // Seed the widget from the loaded data rather than a
                // baked-in constant.
                self.ceiling_value = self
                    .samples
                    .as_deref()
                    .and_then(distance_bounds)
                    .map(|(_, max)| max)
                    .unwrap_or(100_000.0);
            }
            changed = true;
        }

        if self.ceiling_enabled {
            let response = ui.add(
                egui::DragValue::new(&mut self.ceiling_value)
                    .speed(100.0)
                    .range(0.0..=f64::MAX),
            );
            if response.changed() {
                changed = true;
            }
        }

        if changed {
            self.persist_settings();
        }

        if self.loaded_file_path.is_some()
            && ui
                .button("⟳ Reload")
                .on_hover_text("Re-load the current file with this ceiling")
                .clicked()
        {
            self.reload_current();
        }
    }

    /// Render the distance/temperature visibility toggles.
    fn render_series_toggles(&mut self, ui: &mut egui::Ui) {
        let mut show_distance = self.filter.show_distance;
        if ui.checkbox(&mut show_distance, "Distance").changed() {
            self.filter.set_visible(Series::Distance, show_distance);
        }

        let mut show_temperature = self.filter.show_temperature;
        if ui.checkbox(&mut show_temperature, "Temperature").changed() {
            self.filter
                .set_visible(Series::Temperature, show_temperature);
        }
    }

    /// Render the status message if one is active.
    fn render_status_message(&mut self, ui: &mut egui::Ui) {
        // Check if we should dismiss the message
        let should_dismiss = self
            .status_message
            .as_ref()
            .is_some_and(|msg| !msg.is_visible());

        if should_dismiss {
            self.status_message = None;
            return;
        }

        // Extract message info before rendering to avoid borrow issues
        let msg_info = self.status_message.as_ref().map(|msg| {
            let color = match msg.kind {
                StatusKind::Success => self.settings.colors.status_success_color(),
                StatusKind::Error => self.settings.colors.status_error_color(),
            };
            (color, msg.text.clone())
        });

        if let Some((color, text)) = msg_info {
            let mut dismiss_clicked = false;

            ui.horizontal(|ui| {
                if ui.small_button("✕").clicked() {
                    dismiss_clicked = true;
                }
                ui.colored_label(color, &text);
            });

            if dismiss_clicked {
                self.status_message = None;
            }
        }
    }

    /// Render the bottom controls section.
    fn render_controls(&mut self, ctx: &egui::Context) {
        let controls_enabled = self.state.controls_enabled() && self.samples.is_some();
        let is_playing = self.state.is_playing();
        let total = self.total_samples();

        let mut action: Option<ControlAction> = None;

        egui::TopBottomPanel::bottom("controls")
            .min_height(64.0)
            .show(ctx, |ui| {
                let renderer = ControlsRenderer::new(
                    controls_enabled,
                    is_playing,
                    &self.replay,
                    total,
                    self.current_sample(),
                );
                action = renderer.render(ui);
            });

        if let Some(action) = action {
            self.handle_control_action(action);
        }
    }

    /// Handle a control action triggered by user interaction.
    fn handle_control_action(&mut self, action: ControlAction) {
        let total = self.total_samples();

        match action {
            ControlAction::TogglePlayPause => {
                if self.state.is_playing() {
                    self.state = AppState::Ready;
                } else if self.state == AppState::Ready && self.samples.is_some() {
                    self.replay.reset_timing();
                    self.state = AppState::Playing;
                }
            }
            ControlAction::GoToStart => {
                self.replay.go_to_start();
            }
            ControlAction::PreviousSample => {
                self.replay.previous(total);
            }
            ControlAction::NextSample => {
                let _ = self.replay.advance(total);
            }
            ControlAction::GoToEnd => {
                self.replay.go_to_end(total);
            }
            ControlAction::GoToBest => {
                if let Some(samples) = &self.samples {
                    self.replay.go_to_best(samples);
                }
            }
            ControlAction::SetSpeed(speed) => {
                self.replay.set_speed(speed);
                self.persist_settings();
            }
            ControlAction::ToggleLoop => {
                self.replay.loop_enabled = !self.replay.loop_enabled;
                self.persist_settings();
            }
            ControlAction::SeekToSample(sample) => {
                self.replay.set_sample(sample, total);
            }
        }
    }

    /// Render the central section for the active view.
    fn render_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            ViewMode::Run => self.render_run_view(ui),
            ViewMode::Compare => self.render_compare_view(ui),
        });
    }

    /// Render the run view: chart panels or a placeholder.
    fn render_run_view(&mut self, ui: &mut egui::Ui) {
        let Some(samples) = &self.samples else {
            self.render_no_file_placeholder(ui);
            return;
        };

        // File info header
        ui.horizontal(|ui| {
            ui.heading("📈 Run");
            ui.separator();

            if let Some(ref path) = self.loaded_file_path {
                ui.label(format!(
                    "File: {}",
                    path.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "Unknown".to_string())
                ));
            }

            ui.separator();
            ui.label(format!("Samples: {}", samples.len()));

            if let Some((first, last)) = iteration_bounds(samples) {
                ui.separator();
                ui.label(format!("Iterations: {}..{}", first, last));
            }
            if let Some((best, _)) = distance_bounds(samples) {
                ui.separator();
                ui.label(format!("Best distance: {:.2}", best));
            }
            if let Some(c) = self.ceiling() {
                ui.separator();
                ui.label(format!("Ceiling: {:.0}", c));
            }
        });

        ui.separator();
        ui.add_space(5.0);

        let renderer = ChartRenderer::new(
            samples,
            &self.filter,
            &self.settings.colors,
            self.replay.current_sample,
        );
        renderer.render(ui);
    }

    /// Render the comparison view: box plots or a placeholder.
    fn render_compare_view(&mut self, ui: &mut egui::Ui) {
        if self.groups.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading("📊 No Groups Loaded");
                ui.add_space(10.0);
                ui.label("Open one distance log per configuration to compare them.");
                ui.label("Use the \"Compare…\" button or drop the files here.");
            });
            return;
        }

        ui.horizontal(|ui| {
            ui.heading("📊 Comparison");
            ui.separator();
            ui.label(format!("Groups: {}", self.groups.len()));
        });

        ui.separator();
        ui.add_space(5.0);

        let renderer = ComparisonRenderer::new(&self.groups, &self.settings.colors);
        renderer.render(ui);
    }

    /// Render the placeholder view when no run is loaded.
    fn render_no_file_placeholder(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);

            ui.heading("📁 No Run Loaded");
            ui.add_space(10.0);
            ui.label("Drag and drop a run log to get started.");
            ui.label("Or use the \"Open Run\" button in the toolbar.");

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(10.0);
            ui.label("Run logs are plain text, one sample per line:");
            ui.monospace("<iteration> <distance> <temperature>");
        });
    }

    /// Render the modal error dialog and react to its actions.
    fn render_error_dialog(&mut self, ctx: &egui::Context) {
        let action = ErrorDialogRenderer::new(&mut self.error_dialog).render(ctx);

        match action {
            Some(ErrorDialogAction::Retry) => {
                self.clear_error();
                if let Some(path) = self.retry_path.take() {
                    self.load_run(path);
                }
            }
            Some(ErrorDialogAction::Close) => {
                self.retry_path = None;
                self.clear_error();
            }
            None => {}
        }
    }
}
