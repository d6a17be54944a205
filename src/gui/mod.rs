//! GUI module for the annealing run viewer.
//!
//! This module contains the egui-based user interface components
//! including the main application window, toolbar, chart and comparison
//! views, and replay controls.

mod app;
mod chart;
mod compare;
mod controls;
mod dialogs;

pub use app::RunViewerApp;
