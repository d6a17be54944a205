//! Replay controls module.
//!
//! This module handles the rendering and interaction of replay controls
//! including play/pause button, sample navigation, speed control, and
//! the run scrubber.

use eframe::egui;

use crate::core::playback::{ReplayState, SPEED_OPTIONS};
use crate::core::run_log::RunSample;

/// User actions that can be triggered from the controls panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Toggle between play and pause
    TogglePlayPause,
    /// Go to the first sample
    GoToStart,
    /// Go to the previous sample
    PreviousSample,
    /// Go to the next sample
    NextSample,
    /// Go to the last sample
    GoToEnd,
    /// Jump to the lowest-distance sample
    GoToBest,
    /// Change replay speed
    SetSpeed(f32),
    /// Toggle loop-at-end behavior
    ToggleLoop,
    /// Seek to a specific sample (from scrubber)
    SeekToSample(usize),
}

/// Renders replay controls and returns any actions triggered by user interaction.
pub struct ControlsRenderer<'a> {
    /// Whether controls should be enabled
    enabled: bool,
    /// Whether replay is currently active
    is_playing: bool,
    /// Current replay state
    replay: &'a ReplayState,
    /// Number of samples in the loaded run
    total_samples: usize,
    /// Sample under the cursor, if any
    current: Option<&'a RunSample>,
}

impl<'a> ControlsRenderer<'a> {
    /// Create a new controls renderer.
    pub fn new(
        enabled: bool,
        is_playing: bool,
        replay: &'a ReplayState,
        total_samples: usize,
        current: Option<&'a RunSample>,
    ) -> Self {
        Self {
            enabled,
            is_playing,
            replay,
            total_samples,
            current,
        }
    }

    /// Render the controls and return any triggered action.
    pub fn render(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action: Option<ControlAction> = None;

        ui.vertical(|ui| {
            // Replay controls row
            ui.horizontal(|ui| {
                action = self.render_navigation_buttons(ui).or(action);
                ui.separator();
                self.render_position_readout(ui);
                ui.separator();
                action = self.render_speed_control(ui).or(action);
                action = self.render_loop_toggle(ui).or(action);
            });

            ui.add_space(4.0);

            // Scrubber row
            ui.horizontal(|ui| {
                action = self.render_scrubber(ui).or(action);
            });
        });

        action
    }

    /// Render navigation buttons and return any triggered action.
    fn render_navigation_buttons(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action: Option<ControlAction> = None;

        ui.add_enabled_ui(self.enabled, |ui| {
            if ui.button("⏮").on_hover_text("Go to start (Home)").clicked() {
                action = Some(ControlAction::GoToStart);
            }
            if ui
                .button("⏪")
                .on_hover_text("Previous sample (←)")
                .clicked()
            {
                action = Some(ControlAction::PreviousSample);
            }

            // Play/pause button with icon based on current state
            let (btn_text, hover_text) = if self.is_playing {
                ("⏸", "Pause (Space)")
            } else {
                ("▶", "Play (Space)")
            };
            if ui.button(btn_text).on_hover_text(hover_text).clicked() {
                action = Some(ControlAction::TogglePlayPause);
            }

            if ui.button("⏩").on_hover_text("Next sample (→)").clicked() {
                action = Some(ControlAction::NextSample);
            }
            if ui.button("⏭").on_hover_text("Go to end (End)").clicked() {
                action = Some(ControlAction::GoToEnd);
            }
            if ui
                .button("★")
                .on_hover_text("Jump to best distance (B)")
                .clicked()
            {
                action = Some(ControlAction::GoToBest);
            }
        });

        action
    }

    /// Render the cursor position and sample readout.
    fn render_position_readout(&self, ui: &mut egui::Ui) {
        ui.label(format!(
            "Sample: {} / {}",
            self.replay.current_sample.min(self.total_samples.saturating_sub(1)),
            self.total_samples
        ));
        if let Some(sample) = self.current {
            ui.monospace(format!(
                "iter {}  dist {:.2}  temp {:.4}",
                sample.iteration, sample.distance, sample.temperature
            ));
        }
    }

    /// Render speed control and return any triggered action.
    fn render_speed_control(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action: Option<ControlAction> = None;

        ui.add_enabled_ui(self.enabled, |ui| {
            ui.label("Speed:");
            let current_speed = self.replay.speed;
            egui::ComboBox::from_id_salt("speed_combo")
                .selected_text(format!("{:.2}x", current_speed))
                .width(60.0)
                .show_ui(ui, |ui| {
                    for &speed in SPEED_OPTIONS {
                        if ui
                            .selectable_label(
                                (current_speed - speed).abs() < 0.01,
                                format!("{:.2}x", speed),
                            )
                            .clicked()
                        {
                            action = Some(ControlAction::SetSpeed(speed));
                        }
                    }
                });
        });

        action
    }

    /// Render the loop toggle and return any triggered action.
    fn render_loop_toggle(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action: Option<ControlAction> = None;

        ui.add_enabled_ui(self.enabled, |ui| {
            let mut looping = self.replay.loop_enabled;
            if ui.checkbox(&mut looping, "Loop").changed() {
                action = Some(ControlAction::ToggleLoop);
            }
        });

        action
    }

    /// Render the run scrubber and return any triggered action.
    fn render_scrubber(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action: Option<ControlAction> = None;

        ui.add_enabled_ui(self.enabled, |ui| {
            let max_sample = self.total_samples.saturating_sub(1) as f32;
            let mut sample = self.replay.current_sample as f32;
            let response = ui.add(
                egui::Slider::new(&mut sample, 0.0..=max_sample.max(1.0))
                    .show_value(false)
                    .text(""),
            );
            if response.changed() {
                action = Some(ControlAction::SeekToSample(sample as usize));
            }
        });

        action
    }
}
