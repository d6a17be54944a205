//! A lightweight run log viewer and experiment toolkit for simulated
//! annealing.
//!
//! The [`core`] module holds the log formats, statistics, and the
//! annealer itself; [`gui`] is the eframe viewer built on top of it.

pub mod core;
pub mod gui;
