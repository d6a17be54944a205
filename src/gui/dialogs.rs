//! Dialog components for the run viewer.
//!
//! This module provides the modal error dialog used when a log file
//! fails to load or settings cannot be persisted.

use eframe::egui;

use crate::core::error::AppError;

/// Actions that can be triggered from the error dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDialogAction {
    /// User wants to retry the failed operation
    Retry,
    /// User dismissed the dialog
    Close,
}

/// State for managing the error dialog.
#[derive(Debug, Clone, Default)]
pub struct ErrorDialogState {
    /// Whether the dialog is currently open
    pub is_open: bool,
    /// The error to display, if any
    pub error: Option<AppError>,
    /// Whether the error details are expanded
    pub details_expanded: bool,
}

impl ErrorDialogState {
    /// Create a new error dialog state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the error dialog with the given error.
    pub fn show(&mut self, error: AppError) {
        self.is_open = true;
        self.error = Some(error);
        self.details_expanded = false;
    }

    /// Close the error dialog.
    pub fn close(&mut self) {
        self.is_open = false;
        self.error = None;
        self.details_expanded = false;
    }

    /// Check if the dialog is showing an error.
    pub fn has_error(&self) -> bool {
        self.is_open && self.error.is_some()
    }
}

/// Renderer for the error dialog.
pub struct ErrorDialogRenderer<'a> {
    state: &'a mut ErrorDialogState,
}

impl<'a> ErrorDialogRenderer<'a> {
    /// Create a new error dialog renderer.
    pub fn new(state: &'a mut ErrorDialogState) -> Self {
        Self { state }
    }

    /// Render the error dialog and return the action taken.
    ///
    /// Returns `Some(action)` if the user clicked a button, `None` otherwise.
    pub fn render(&mut self, ctx: &egui::Context) -> Option<ErrorDialogAction> {
        if !self.state.is_open || self.state.error.is_none() {
            return None;
        }

        let mut action: Option<ErrorDialogAction> = None;
        let mut should_close = false;

        // Clone what we need from the error to avoid borrow issues
        let error = self.state.error.as_ref().unwrap();
        let title = error.dialog_title();
        let brief = error.brief_description();
        let detailed = error.detailed_info();
        let supports_retry = error.supports_retry();
        let is_recoverable = error.is_recoverable();

        // Dim the rest of the window behind the modal
        let screen_rect = ctx.input(|i| i.viewport_rect());
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("error_dialog_overlay"),
        ));
        painter.rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(150));

        egui::Window::new(format!("⚠ {}", title))
            .id(egui::Id::new("error_dialog"))
            .collapsible(false)
            .resizable(true)
            .default_width(450.0)
            .min_width(350.0)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.add_space(8.0);

                ui.label(egui::RichText::new(&brief).size(14.0));

                ui.add_space(12.0);

                // Details section (collapsible)
                let details_header = if self.state.details_expanded {
                    "▼ Details"
                } else {
                    "▶ Details"
                };

                if ui
                    .add(egui::Button::new(details_header).frame(false))
                    .clicked()
                {
                    self.state.details_expanded = !self.state.details_expanded;
                }

                if self.state.details_expanded {
                    ui.add_space(4.0);
                    egui::Frame::new()
                        .fill(egui::Color32::from_gray(30))
                        .inner_margin(8.0)
                        .corner_radius(4.0)
                        .show(ui, |ui| {
                            ui.style_mut().override_font_id = Some(egui::FontId::monospace(12.0));
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(&detailed).color(egui::Color32::LIGHT_GRAY),
                                )
                                .wrap(),
                            );
                        });
                }

                ui.add_space(12.0);
                ui.separator();

                // Action buttons
                ui.horizontal(|ui| {
                    if ui
                        .button("📋 Copy Error")
                        .on_hover_text("Copy error details to clipboard")
                        .clicked()
                    {
                        ui.ctx().copy_text(detailed.clone());
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if is_recoverable && ui.button("Close").clicked() {
                            should_close = true;
                            action = Some(ErrorDialogAction::Close);
                        }

                        if supports_retry
                            && ui
                                .button("🔄 Retry")
                                .on_hover_text("Try loading the file again")
                                .clicked()
                        {
                            should_close = true;
                            action = Some(ErrorDialogAction::Retry);
                        }
                    });
                });

                ui.add_space(4.0);
            });

        if should_close {
            self.state.close();
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_dialog_state_new() {
        let state = ErrorDialogState::new();
        assert!(!state.is_open);
        assert!(state.error.is_none());
        assert!(!state.details_expanded);
    }

    #[test]
    fn test_error_dialog_state_show() {
        let mut state = ErrorDialogState::new();
        let error = AppError::FileNotFound {
            path: PathBuf::from("/test/run.txt"),
        };

        state.show(error);
        assert!(state.is_open);
        assert!(state.error.is_some());
        assert!(!state.details_expanded);
        assert!(state.has_error());
    }

    #[test]
    fn test_error_dialog_state_close() {
        let mut state = ErrorDialogState::new();
        state.show(AppError::FileNotFound {
            path: PathBuf::from("/test/run.txt"),
        });
        state.close();

        assert!(!state.is_open);
        assert!(state.error.is_none());
        assert!(!state.has_error());
    }
}
