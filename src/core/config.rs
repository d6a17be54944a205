//! Configuration and settings module.
//!
//! This module handles persistent settings including chart color
//! customization, the default distance ceiling, saving/loading
//! configuration to disk, and default values.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings filename for persistence.
const SETTINGS_FILENAME: &str = "config.json";

/// Maximum number of recent files to track.
const MAX_RECENT_FILES: usize = 10;

/// Color settings for the application UI.
///
/// All colors can be customized by the user and are persisted to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSettings {
    // Series colors
    /// Distance curve color (default: light blue)
    pub distance_series: [u8; 3],
    /// Temperature curve color (default: orange)
    pub temperature_series: [u8; 3],

    // Marker colors
    /// Replay cursor line color
    pub cursor: [u8; 3],
    /// Best-distance marker color
    pub best_marker: [u8; 3],

    // Background colors
    /// Chart panel background color
    pub background: [u8; 3],
    /// Panel header background color
    pub header_background: [u8; 3],

    // Grid colors
    /// Grid line color
    pub grid: [u8; 3],

    // Box plot colors
    /// Box fill color
    pub box_fill: [u8; 3],
    /// Box outline, whisker, and median color
    pub box_stroke: [u8; 3],
    /// Mean marker color
    pub mean_marker: [u8; 3],

    // Text colors
    /// Axis tick and group label text color
    pub text_label: [u8; 3],
    /// Placeholder/inactive text color
    pub text_dim: [u8; 3],

    // Status colors
    /// Success status color
    pub status_success: [u8; 3],
    /// Error status color
    pub status_error: [u8; 3],
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            // Series colors
            distance_series: [100, 150, 200], // Light blue
            temperature_series: [230, 150, 60], // Orange

            // Marker colors
            cursor: [255, 200, 100],    // Orange/gold
            best_marker: [76, 175, 80], // Green

            // Background colors
            background: [30, 30, 35],        // Dark gray
            header_background: [40, 40, 45], // Slightly lighter

            // Grid colors
            grid: [50, 50, 55], // Medium gray

            // Box plot colors
            box_fill: [60, 90, 120],     // Muted blue
            box_stroke: [150, 180, 210], // Pale blue
            mean_marker: [255, 215, 0],  // Gold

            // Text colors
            text_label: [211, 211, 211], // Light gray
            text_dim: [105, 105, 105],   // Dark gray

            // Status colors
            status_success: [76, 175, 80], // Green
            status_error: [244, 67, 54],   // Red
        }
    }
}

impl ColorSettings {
    /// Convert a color array to egui Color32.
    #[inline]
    pub fn to_color32(color: [u8; 3]) -> Color32 {
        Color32::from_rgb(color[0], color[1], color[2])
    }

    /// Convert a color array to egui Color32 with alpha.
    #[inline]
    pub fn to_color32_alpha(color: [u8; 3], alpha: u8) -> Color32 {
        Color32::from_rgba_unmultiplied(color[0], color[1], color[2], alpha)
    }

    // Convenience methods to get Color32 values directly

    /// Get distance series color as Color32.
    pub fn distance_series_color(&self) -> Color32 {
        Self::to_color32(self.distance_series)
    }

    /// Get temperature series color as Color32.
    pub fn temperature_series_color(&self) -> Color32 {
        Self::to_color32(self.temperature_series)
    }

    /// Get cursor color as Color32.
    pub fn cursor_color(&self) -> Color32 {
        Self::to_color32(self.cursor)
    }

    /// Get cursor color with alpha.
    pub fn cursor_color_alpha(&self, alpha: u8) -> Color32 {
        Self::to_color32_alpha(self.cursor, alpha)
    }

    /// Get best-distance marker color as Color32.
    pub fn best_marker_color(&self) -> Color32 {
        Self::to_color32(self.best_marker)
    }

    /// Get background color as Color32.
    pub fn background_color(&self) -> Color32 {
        Self::to_color32(self.background)
    }

    /// Get header background color as Color32.
    pub fn header_background_color(&self) -> Color32 {
        Self::to_color32(self.header_background)
    }

    /// Get grid color as Color32.
    pub fn grid_color(&self) -> Color32 {
        Self::to_color32(self.grid)
    }

    /// Get box fill color as Color32.
    pub fn box_fill_color(&self) -> Color32 {
        Self::to_color32(self.box_fill)
    }

    /// Get box stroke color as Color32.
    pub fn box_stroke_color(&self) -> Color32 {
        Self::to_color32(self.box_stroke)
    }

    /// Get mean marker color as Color32.
    pub fn mean_marker_color(&self) -> Color32 {
        Self::to_color32(self.mean_marker)
    }

    /// Get label text color as Color32.
    pub fn text_label_color(&self) -> Color32 {
        Self::to_color32(self.text_label)
    }

    /// Get dim text color as Color32.
    pub fn text_dim_color(&self) -> Color32 {
        Self::to_color32(self.text_dim)
    }

    /// Get success status color as Color32.
    pub fn status_success_color(&self) -> Color32 {
        Self::to_color32(self.status_success)
    }

    /// Get error status color as Color32.
    pub fn status_error_color(&self) -> Color32 {
        Self::to_color32(self.status_error)
    }
}

/// Application settings including color customization and user preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Color customization settings.
    pub colors: ColorSettings,

    /// Default distance ceiling applied when loading run logs.
    /// `None` disables filtering.
    #[serde(default)]
    pub default_ceiling: Option<f64>,

    /// Default replay speed (0.1 to 10.0).
    #[serde(default = "default_speed")]
    pub default_speed: f32,

    /// Whether loop replay is enabled by default.
    #[serde(default)]
    pub loop_enabled: bool,

    /// Recently opened files (most recent first).
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,

    /// Window size to restore on startup (width, height).
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,
}

/// Default replay speed.
fn default_speed() -> f32 {
    1.0
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            colors: ColorSettings::default(),
            default_ceiling: None,
            default_speed: default_speed(),
            loop_enabled: false,
            recent_files: Vec::new(),
            window_size: None,
        }
    }
}

impl AppSettings {
    /// Get the settings file path in the user's config directory.
    fn get_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("anneal-log-viewer");
            path.push(SETTINGS_FILENAME);
            path
        })
    }

    /// Load settings from disk, returning defaults if loading fails.
    pub fn load() -> Self {
        Self::get_settings_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save settings to disk.
    ///
    /// Returns an error if saving fails.
    pub fn save(&self) -> Result<(), String> {
        let path = Self::get_settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Reset all settings to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add a file to the recent files list.
    ///
    /// The file is moved to the front of the list. If it already exists, it is
    /// moved to the front. The list is capped at MAX_RECENT_FILES entries.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Clear the recent files list.
    pub fn clear_recent_files(&mut self) {
        self.recent_files.clear();
    }

    /// Get the default replay speed, clamped to valid range.
    pub fn get_default_speed(&self) -> f32 {
        self.default_speed.clamp(0.1, 10.0)
    }

    /// Set the default replay speed.
    pub fn set_default_speed(&mut self, speed: f32) {
        self.default_speed = speed.clamp(0.1, 10.0);
    }

    /// Set the window size.
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.window_size = Some((width, height));
    }

    /// Get the config file path for display purposes.
    pub fn get_config_path() -> Option<PathBuf> {
        Self::get_settings_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_settings_default() {
        let settings = ColorSettings::default();
        assert_eq!(settings.distance_series, [100, 150, 200]);
        assert_eq!(settings.status_error, [244, 67, 54]);
    }

    #[test]
    fn test_color32_conversion() {
        let color = [255, 128, 64];
        let color32 = ColorSettings::to_color32(color);
        assert_eq!(color32, Color32::from_rgb(255, 128, 64));
    }

    #[test]
    fn test_color32_alpha_conversion() {
        let color = [255, 128, 64];
        let color32 = ColorSettings::to_color32_alpha(color, 100);
        assert_eq!(color32, Color32::from_rgba_unmultiplied(255, 128, 64, 100));
    }

    #[test]
    fn test_color_settings_methods() {
        let settings = ColorSettings::default();
        assert_eq!(
            settings.best_marker_color(),
            Color32::from_rgb(76, 175, 80)
        );
        assert_eq!(settings.mean_marker_color(), Color32::from_rgb(255, 215, 0));
    }

    #[test]
    fn test_app_settings_default() {
        let settings = AppSettings::default();
        assert_eq!(settings.colors, ColorSettings::default());
        assert_eq!(settings.default_ceiling, None);
        assert_eq!(settings.default_speed, 1.0);
        assert!(!settings.loop_enabled);
        assert!(settings.recent_files.is_empty());
        assert!(settings.window_size.is_none());
    }

    #[test]
    fn test_app_settings_reset() {
        let mut settings = AppSettings::default();
        settings.colors.distance_series = [0, 0, 0];
        settings.default_ceiling = Some(120_000.0);
        settings.default_speed = 2.0;
        settings.recent_files.push(PathBuf::from("/test/run.txt"));

        settings.reset();

        assert_eq!(settings.colors.distance_series, [100, 150, 200]);
        assert_eq!(settings.default_ceiling, None);
        assert_eq!(settings.default_speed, 1.0);
        assert!(settings.recent_files.is_empty());
    }

    #[test]
    fn test_settings_serialization() {
        let mut settings = AppSettings::default();
        settings.default_ceiling = Some(140_000.0);
        settings.default_speed = 2.5;
        settings.loop_enabled = true;
        settings.recent_files.push(PathBuf::from("/test/run.txt"));
        settings.window_size = Some((1024.0, 768.0));

        let json = serde_json::to_string(&settings).unwrap();
        let restored: AppSettings = serde_json::from_str(&json).unwrap();

        assert_eq!(settings.colors, restored.colors);
        assert_eq!(restored.default_ceiling, Some(140_000.0));
        assert_eq!(restored.default_speed, 2.5);
        assert!(restored.loop_enabled);
        assert_eq!(restored.recent_files.len(), 1);
        assert_eq!(restored.window_size, Some((1024.0, 768.0)));
    }

    #[test]
    fn test_recent_files_add() {
        let mut settings = AppSettings::default();

        settings.add_recent_file(PathBuf::from("/test/run1.txt"));
        assert_eq!(settings.recent_files.len(), 1);

        settings.add_recent_file(PathBuf::from("/test/run2.txt"));
        assert_eq!(settings.recent_files[0], PathBuf::from("/test/run2.txt"));
        assert_eq!(settings.recent_files[1], PathBuf::from("/test/run1.txt"));

        // Re-adding moves to front without duplicating
        settings.add_recent_file(PathBuf::from("/test/run1.txt"));
        assert_eq!(settings.recent_files.len(), 2);
        assert_eq!(settings.recent_files[0], PathBuf::from("/test/run1.txt"));
    }

    #[test]
    fn test_recent_files_max_limit() {
        let mut settings = AppSettings::default();

        for i in 0..15 {
            settings.add_recent_file(PathBuf::from(format!("/test/run{}.txt", i)));
        }

        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(settings.recent_files[0], PathBuf::from("/test/run14.txt"));
    }

    #[test]
    fn test_recent_files_clear() {
        let mut settings = AppSettings::default();
        settings.add_recent_file(PathBuf::from("/test/run1.txt"));

        settings.clear_recent_files();

        assert!(settings.recent_files.is_empty());
    }

    #[test]
    fn test_default_speed_clamping() {
        let mut settings = AppSettings::default();

        settings.set_default_speed(2.0);
        assert_eq!(settings.get_default_speed(), 2.0);

        settings.set_default_speed(0.01);
        assert_eq!(settings.get_default_speed(), 0.1);

        settings.set_default_speed(100.0);
        assert_eq!(settings.get_default_speed(), 10.0);
    }

    #[test]
    fn test_backward_compatible_deserialization() {
        // Old config files carrying only colors still load; new fields
        // take their defaults.
        let old_json = r#"{"colors":{"distance_series":[100,150,200],"temperature_series":[230,150,60],"cursor":[255,200,100],"best_marker":[76,175,80],"background":[30,30,35],"header_background":[40,40,45],"grid":[50,50,55],"box_fill":[60,90,120],"box_stroke":[150,180,210],"mean_marker":[255,215,0],"text_label":[211,211,211],"text_dim":[105,105,105],"status_success":[76,175,80],"status_error":[244,67,54]}}"#;

        let settings: AppSettings = serde_json::from_str(old_json).unwrap();

        assert_eq!(settings.default_ceiling, None);
        assert_eq!(settings.default_speed, 1.0);
        assert!(!settings.loop_enabled);
        assert!(settings.recent_files.is_empty());
        assert!(settings.window_size.is_none());
    }
}
