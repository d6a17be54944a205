//! Replay state management for sweeping through a loaded run.
//!
//! This module provides the ReplayState structure that manages the
//! cursor position within the sample sequence, replay speed, loop
//! settings, and the timing logic for advancing the cursor.

use std::time::{Duration, Instant};

use super::run_log::{best_sample_index, RunSample};

/// Default replay speed (1.0 = normal speed).
pub const DEFAULT_SPEED: f32 = 1.0;

/// Minimum allowed replay speed.
pub const MIN_SPEED: f32 = 0.1;

/// Maximum allowed replay speed.
pub const MAX_SPEED: f32 = 10.0;

/// Available speed presets for the UI.
pub const SPEED_OPTIONS: &[f32] = &[0.25, 0.5, 1.0, 2.0, 4.0];

/// Base cursor advance rate at 1.0x speed, in samples per second.
pub const BASE_SAMPLES_PER_SECOND: u32 = 60;

/// Manages replay state including cursor position, speed, and timing.
#[derive(Debug, Clone)]
pub struct ReplayState {
    /// Current sample index (0-indexed into the loaded run).
    pub current_sample: usize,

    /// Replay speed multiplier (1.0 = normal speed).
    /// Higher values = faster replay.
    pub speed: f32,

    /// Whether to loop back to the start when reaching the end.
    pub loop_enabled: bool,

    /// Last time the cursor was advanced (for timing control).
    last_update: Instant,
}

impl Default for ReplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayState {
    /// Create a new ReplayState with default values.
    pub fn new() -> Self {
        Self {
            current_sample: 0,
            speed: DEFAULT_SPEED,
            loop_enabled: true,
            last_update: Instant::now(),
        }
    }

    /// Check if enough time has elapsed to advance to the next sample.
    ///
    /// # Arguments
    /// * `rate` - Base cursor advance rate in samples per second.
    ///
    /// # Returns
    /// `true` if enough time has passed to advance the cursor, `false` otherwise.
    pub fn should_advance(&self, rate: u32) -> bool {
        if rate == 0 || self.speed <= 0.0 {
            return false;
        }

        let step_duration = Duration::from_secs_f32(1.0 / (rate as f32 * self.speed));
        self.last_update.elapsed() >= step_duration
    }

    /// Mark that a cursor advance has occurred, updating the timestamp.
    pub fn mark_advanced(&mut self) {
        self.last_update = Instant::now();
    }

    /// Set the current sample, clamping to valid range.
    ///
    /// # Arguments
    /// * `sample` - The desired sample index.
    /// * `total_samples` - The number of samples in the loaded run.
    pub fn set_sample(&mut self, sample: usize, total_samples: usize) {
        let max_sample = total_samples.saturating_sub(1);
        self.current_sample = sample.min(max_sample);
    }

    /// Advance to the next sample.
    ///
    /// # Arguments
    /// * `total_samples` - The number of samples in the loaded run.
    ///
    /// # Returns
    /// `true` if replay should continue, `false` if the end was reached
    /// and looping is disabled.
    pub fn advance(&mut self, total_samples: usize) -> bool {
        let end = total_samples.saturating_sub(1);

        if self.current_sample >= end {
            if self.loop_enabled {
                self.current_sample = 0;
                self.mark_advanced();
                true
            } else {
                false
            }
        } else {
            self.current_sample += 1;
            self.mark_advanced();
            true
        }
    }

    /// Go to the previous sample.
    ///
    /// # Arguments
    /// * `total_samples` - The number of samples in the loaded run.
    pub fn previous(&mut self, total_samples: usize) {
        if self.current_sample == 0 {
            if self.loop_enabled {
                self.current_sample = total_samples.saturating_sub(1);
            }
        } else {
            self.current_sample -= 1;
        }
    }

    /// Go to the first sample.
    pub fn go_to_start(&mut self) {
        self.current_sample = 0;
    }

    /// Go to the last sample.
    ///
    /// # Arguments
    /// * `total_samples` - The number of samples in the loaded run.
    pub fn go_to_end(&mut self, total_samples: usize) {
        self.current_sample = total_samples.saturating_sub(1);
    }

    /// Jump the cursor to the sample with the lowest distance.
    ///
    /// Does nothing for an empty run. Ties resolve to the earliest
    /// sample, matching [`best_sample_index`].
    pub fn go_to_best(&mut self, samples: &[RunSample]) {
        if let Some(index) = best_sample_index(samples) {
            self.current_sample = index;
        }
    }

    /// Set replay speed, clamping to valid range.
    ///
    /// # Arguments
    /// * `speed` - The desired replay speed multiplier.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Get the next speed preset from SPEED_OPTIONS.
    ///
    /// Returns the next higher speed preset, or the maximum if already at max.
    pub fn next_speed_preset(&self) -> f32 {
        for &preset in SPEED_OPTIONS {
            if preset > self.speed {
                return preset;
            }
        }
        *SPEED_OPTIONS.last().unwrap_or(&DEFAULT_SPEED)
    }

    /// Get the previous speed preset from SPEED_OPTIONS.
    ///
    /// Returns the next lower speed preset, or the minimum if already at min.
    pub fn prev_speed_preset(&self) -> f32 {
        for &preset in SPEED_OPTIONS.iter().rev() {
            if preset < self.speed {
                return preset;
            }
        }
        *SPEED_OPTIONS.first().unwrap_or(&DEFAULT_SPEED)
    }

    /// Reset the timing for cursor advance (call when starting replay).
    pub fn reset_timing(&mut self) {
        self.last_update = Instant::now();
    }

    /// Check if the cursor is at the first sample.
    pub fn is_at_start(&self) -> bool {
        self.current_sample == 0
    }

    /// Check if the cursor is at the last sample.
    ///
    /// # Arguments
    /// * `total_samples` - The number of samples in the loaded run.
    pub fn is_at_end(&self, total_samples: usize) -> bool {
        self.current_sample >= total_samples.saturating_sub(1)
    }
}
