//! Run chart rendering module.
//!
//! This module draws the loaded run as stacked panels sharing the
//! iteration axis, one panel per visible series (distance,
//! temperature), including the grid, tick labels, the replay cursor,
//! and the best-distance marker.

use eframe::egui::{self, Color32, Painter, Pos2, Rect, Stroke};

use crate::core::config::ColorSettings;
use crate::core::filter::{FilterState, Series};
use crate::core::run_log::{
    best_sample_index, distance_bounds, iteration_bounds, temperature_bounds, RunSample,
};

/// Height of the per-panel title band.
const PANEL_HEADER_HEIGHT: f32 = 20.0;

/// Width of the y-axis tick label column on the left side.
const AXIS_LABEL_WIDTH: f32 = 70.0;

/// Vertical gap between stacked panels.
const PANEL_GAP: f32 = 8.0;

/// Minimum drawable panel height.
const MIN_PANEL_HEIGHT: f32 = 90.0;

/// Fraction of the value span added as headroom above and below a curve.
const VALUE_PAD: f64 = 0.05;

/// Chart renderer that draws run series over iterations.
pub struct ChartRenderer<'a> {
    /// The samples to render, in file order
    samples: &'a [RunSample],
    /// Series visibility
    filter: &'a FilterState,
    /// Color scheme
    colors: &'a ColorSettings,
    /// Replay cursor position (sample index)
    cursor: usize,
}

impl<'a> ChartRenderer<'a> {
    /// Create a new chart renderer for the given run.
    pub fn new(
        samples: &'a [RunSample],
        filter: &'a FilterState,
        colors: &'a ColorSettings,
        cursor: usize,
    ) -> Self {
        Self {
            samples,
            filter,
            colors,
            cursor,
        }
    }

    /// Render all visible panels stacked vertically.
    pub fn render(&self, ui: &mut egui::Ui) {
        let panels: Vec<Series> = [Series::Distance, Series::Temperature]
            .into_iter()
            .filter(|s| self.filter.is_visible(*s))
            .collect();

        if self.samples.is_empty() || panels.is_empty() {
            ui.colored_label(self.colors.text_dim_color(), "No samples to display.");
            return;
        }

        let available = ui.available_size();
        let gap_total = PANEL_GAP * (panels.len() as f32 - 1.0);
        let panel_height =
            ((available.y - gap_total) / panels.len() as f32).max(MIN_PANEL_HEIGHT);
        let total_height = panel_height * panels.len() as f32 + gap_total;

        let (response, painter) = ui.allocate_painter(
            egui::vec2(available.x, total_height),
            egui::Sense::hover(),
        );
        let rect = response.rect;

        for (i, series) in panels.iter().enumerate() {
            let top = rect.top() + i as f32 * (panel_height + PANEL_GAP);
            let panel_rect = Rect::from_min_size(
                Pos2::new(rect.left(), top),
                egui::vec2(rect.width(), panel_height),
            );
            self.draw_panel(&painter, panel_rect, *series);
        }
    }

    /// Draw one series panel: background, header, grid, curve, markers.
    fn draw_panel(&self, painter: &Painter, rect: Rect, series: Series) {
        painter.rect_filled(rect, 0.0, self.colors.background_color());
        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(1.0, Color32::DARK_GRAY),
            egui::StrokeKind::Inside,
        );

        self.draw_header(painter, rect, series);

        let plot_rect = Rect::from_min_max(
            Pos2::new(rect.left() + AXIS_LABEL_WIDTH, rect.top() + PANEL_HEADER_HEIGHT),
            Pos2::new(rect.right() - 4.0, rect.bottom() - 14.0),
        );

        let x_bounds = match iteration_bounds(self.samples) {
            Some(b) => b,
            None => return,
        };
        let y_bounds = match self.series_bounds(series) {
            Some(b) => padded(b),
            None => return,
        };

        self.draw_grid(painter, rect, plot_rect, x_bounds, y_bounds);
        self.draw_curve(painter, plot_rect, series, x_bounds, y_bounds);
        if series == Series::Distance {
            self.draw_best_marker(painter, plot_rect, x_bounds, y_bounds);
        }
        self.draw_cursor(painter, plot_rect, x_bounds);
    }

    /// Draw the panel title band with the value under the cursor.
    fn draw_header(&self, painter: &Painter, rect: Rect, series: Series) {
        let header_rect = Rect::from_min_max(
            rect.min,
            Pos2::new(rect.right(), rect.top() + PANEL_HEADER_HEIGHT),
        );
        painter.rect_filled(header_rect, 0.0, self.colors.header_background_color());

        let (title, color) = match series {
            Series::Distance => ("Distance", self.colors.distance_series_color()),
            Series::Temperature => ("Temperature", self.colors.temperature_series_color()),
        };
        painter.text(
            Pos2::new(rect.left() + 8.0, header_rect.center().y),
            egui::Align2::LEFT_CENTER,
            title,
            egui::FontId::proportional(12.0),
            color,
        );

        if let Some(sample) = self.samples.get(self.cursor) {
            let value = match series {
                Series::Distance => sample.distance,
                Series::Temperature => sample.temperature,
            };
            painter.text(
                Pos2::new(rect.right() - 8.0, header_rect.center().y),
                egui::Align2::RIGHT_CENTER,
                format!("iter {}  ·  {}", sample.iteration, format_value(value)),
                egui::FontId::monospace(11.0),
                self.colors.text_label_color(),
            );
        }
    }

    /// Draw grid lines and tick labels for both axes.
    fn draw_grid(
        &self,
        painter: &Painter,
        rect: Rect,
        plot: Rect,
        x_bounds: (u64, u64),
        y_bounds: (f64, f64),
    ) {
        let grid_stroke = Stroke::new(0.5, self.colors.grid_color());
        let label_color = self.colors.text_dim_color();
        let font = egui::FontId::proportional(10.0);

        // Vertical lines at nice iteration intervals
        let x_span = (x_bounds.1 - x_bounds.0).max(1) as f64;
        let x_step = nice_interval(x_span, 6.0).max(1.0) as u64;
        let mut tick = x_bounds.0 - x_bounds.0 % x_step;
        while tick <= x_bounds.1 {
            if tick >= x_bounds.0 {
                let x = x_position(plot, x_bounds, tick);
                painter.line_segment(
                    [Pos2::new(x, plot.top()), Pos2::new(x, plot.bottom())],
                    grid_stroke,
                );
                painter.text(
                    Pos2::new(x, rect.bottom() - 7.0),
                    egui::Align2::CENTER_CENTER,
                    format!("{}", tick),
                    font.clone(),
                    label_color,
                );
            }
            tick = match tick.checked_add(x_step) {
                Some(t) => t,
                None => break,
            };
        }

        // Horizontal lines at nice value intervals
        let y_step = nice_interval(y_bounds.1 - y_bounds.0, 4.0);
        if y_step > 0.0 {
            let mut value = (y_bounds.0 / y_step).ceil() * y_step;
            while value <= y_bounds.1 {
                let y = y_position(plot, y_bounds, value);
                painter.line_segment(
                    [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
                    grid_stroke,
                );
                painter.text(
                    Pos2::new(plot.left() - 4.0, y),
                    egui::Align2::RIGHT_CENTER,
                    format_value(value),
                    font.clone(),
                    label_color,
                );
                value += y_step;
            }
        }
    }

    /// Draw the series polyline, striding over dense runs so the point
    /// count stays proportional to the pixel width.
    fn draw_curve(
        &self,
        painter: &Painter,
        plot: Rect,
        series: Series,
        x_bounds: (u64, u64),
        y_bounds: (f64, f64),
    ) {
        let color = match series {
            Series::Distance => self.colors.distance_series_color(),
            Series::Temperature => self.colors.temperature_series_color(),
        };
        let stroke = Stroke::new(1.2, color);

        let stride = (self.samples.len() / plot.width().max(1.0) as usize).max(1);
        let last = self.samples.len() - 1;
        let mut prev: Option<Pos2> = None;
        let mut index = 0;
        loop {
            let sample = &self.samples[index];
            let value = match series {
                Series::Distance => sample.distance,
                Series::Temperature => sample.temperature,
            };
            let point = Pos2::new(
                x_position(plot, x_bounds, sample.iteration),
                y_position(plot, y_bounds, value),
            );
            if let Some(p) = prev {
                painter.line_segment([p, point], stroke);
            }
            prev = Some(point);

            if index == last {
                break;
            }
            // The last sample always lands on the curve, stride or not.
            index = (index + stride).min(last);
        }
    }

    /// Mark the lowest-distance sample on the distance panel.
    fn draw_best_marker(
        &self,
        painter: &Painter,
        plot: Rect,
        x_bounds: (u64, u64),
        y_bounds: (f64, f64),
    ) {
        if let Some(best) = best_sample_index(self.samples) {
            let sample = &self.samples[best];
            let pos = Pos2::new(
                x_position(plot, x_bounds, sample.iteration),
                y_position(plot, y_bounds, sample.distance),
            );
            painter.circle_stroke(pos, 4.0, Stroke::new(1.5, self.colors.best_marker_color()));
        }
    }

    /// Draw the replay cursor as a vertical line.
    fn draw_cursor(&self, painter: &Painter, plot: Rect, x_bounds: (u64, u64)) {
        if let Some(sample) = self.samples.get(self.cursor) {
            let x = x_position(plot, x_bounds, sample.iteration);
            painter.line_segment(
                [Pos2::new(x, plot.top()), Pos2::new(x, plot.bottom())],
                Stroke::new(1.0, self.colors.cursor_color_alpha(200)),
            );
        }
    }

    fn series_bounds(&self, series: Series) -> Option<(f64, f64)> {
        match series {
            Series::Distance => distance_bounds(self.samples),
            Series::Temperature => temperature_bounds(self.samples),
        }
    }
}

/// Map an iteration onto the plot's x range.
fn x_position(plot: Rect, bounds: (u64, u64), iteration: u64) -> f32 {
    let span = (bounds.1 - bounds.0).max(1) as f64;
    let frac = (iteration.saturating_sub(bounds.0)) as f64 / span;
    plot.left() + (frac as f32) * plot.width()
}

/// Map a value onto the plot's y range (screen y grows downwards).
fn y_position(plot: Rect, bounds: (f64, f64), value: f64) -> f32 {
    let span = bounds.1 - bounds.0;
    let frac = if span > 0.0 {
        (value - bounds.0) / span
    } else {
        0.5
    };
    plot.bottom() - (frac as f32) * plot.height()
}

/// Pad a value range so curves do not touch the panel edges.
fn padded(bounds: (f64, f64)) -> (f64, f64) {
    let span = bounds.1 - bounds.0;
    let pad = if span > 0.0 { span * VALUE_PAD } else { 1.0 };
    (bounds.0 - pad, bounds.1 + pad)
}

/// Pick a 1/2/5-shaped tick interval producing roughly `target` ticks
/// over `span`.
fn nice_interval(span: f64, target: f64) -> f64 {
    if span <= 0.0 || target <= 0.0 {
        return 1.0;
    }
    let raw = span / target;
    let magnitude = 10f64.powf(raw.log10().floor());
    let ratio = raw / magnitude;
    let factor = if ratio <= 1.0 {
        1.0
    } else if ratio <= 2.0 {
        2.0
    } else if ratio <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Compact numeric formatting for tick and readout labels.
fn format_value(value: f64) -> String {
    let abs = value.abs();
    if value != 0.0 && abs < 0.01 {
        format!("{:.2e}", value)
    } else if abs >= 10_000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_interval_shapes() {
        assert_eq!(nice_interval(100.0, 5.0), 20.0);
        assert_eq!(nice_interval(1000.0, 4.0), 500.0);
        assert_eq!(nice_interval(7.0, 7.0), 1.0);
        assert_eq!(nice_interval(0.0, 5.0), 1.0);
    }

    #[test]
    fn test_format_value_ranges() {
        assert_eq!(format_value(47102.25), "47102");
        assert_eq!(format_value(450.75), "450.75");
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(0.00001), "1.00e-5");
    }

    #[test]
    fn test_x_position_endpoints() {
        let plot = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 50.0));
        assert_eq!(x_position(plot, (0, 200), 0), 0.0);
        assert_eq!(x_position(plot, (0, 200), 200), 100.0);
        assert_eq!(x_position(plot, (0, 200), 100), 50.0);
    }

    #[test]
    fn test_y_position_inverts_axis() {
        let plot = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 50.0));
        // Larger values sit higher on screen (smaller y).
        assert_eq!(y_position(plot, (0.0, 10.0), 10.0), 0.0);
        assert_eq!(y_position(plot, (0.0, 10.0), 0.0), 50.0);
    }

    #[test]
    fn test_padded_degenerate_range() {
        let (lo, hi) = padded((5.0, 5.0));
        assert!(lo < 5.0 && hi > 5.0);
    }
}
