//! Comparison view rendering module.
//!
//! Draws one box plot per loaded distance group (whiskers to min/max,
//! box from the first to the third quartile, median line, mean marker)
//! followed by a summary-statistics table. This is how runs of
//! different cooling schedules and temperature cadences get compared
//! against each other.

use eframe::egui::{self, Color32, Painter, Pos2, Rect, Stroke};

use crate::core::config::ColorSettings;
use crate::core::run_log::DistanceGroup;
use crate::core::stats::Summary;

/// Height of the box plot drawing area.
const PLOT_HEIGHT: f32 = 280.0;

/// Width of the y-axis tick label column.
const AXIS_LABEL_WIDTH: f32 = 70.0;

/// Height reserved under the plot for group labels.
const LABEL_BAND_HEIGHT: f32 = 18.0;

/// Box width as a fraction of each group's horizontal slot.
const BOX_WIDTH_FRACTION: f32 = 0.5;

/// Renders the comparison view for a set of distance groups.
pub struct ComparisonRenderer<'a> {
    groups: &'a [DistanceGroup],
    colors: &'a ColorSettings,
}

impl<'a> ComparisonRenderer<'a> {
    /// Create a new comparison renderer.
    pub fn new(groups: &'a [DistanceGroup], colors: &'a ColorSettings) -> Self {
        Self { groups, colors }
    }

    /// Render box plots and the summary table.
    pub fn render(&self, ui: &mut egui::Ui) {
        let summaries: Vec<(&DistanceGroup, Summary)> = self
            .groups
            .iter()
            .filter_map(|g| Summary::from_values(&g.values).map(|s| (g, s)))
            .collect();

        if summaries.is_empty() {
            ui.colored_label(
                self.colors.text_dim_color(),
                "No distance samples to compare.",
            );
            return;
        }

        self.draw_boxes(ui, &summaries);
        ui.add_space(10.0);
        self.draw_table(ui, &summaries);
    }

    fn draw_boxes(&self, ui: &mut egui::Ui, summaries: &[(&DistanceGroup, Summary)]) {
        let width = ui.available_size().x;
        let (response, painter) = ui.allocate_painter(
            egui::vec2(width, PLOT_HEIGHT + LABEL_BAND_HEIGHT),
            egui::Sense::hover(),
        );
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, self.colors.background_color());
        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(1.0, Color32::DARK_GRAY),
            egui::StrokeKind::Inside,
        );

        let plot = Rect::from_min_max(
            Pos2::new(rect.left() + AXIS_LABEL_WIDTH, rect.top() + 8.0),
            Pos2::new(rect.right() - 8.0, rect.bottom() - LABEL_BAND_HEIGHT),
        );

        // Shared value scale across every group
        let min = summaries
            .iter()
            .map(|(_, s)| s.min)
            .fold(f64::INFINITY, f64::min);
        let max = summaries
            .iter()
            .map(|(_, s)| s.max)
            .fold(f64::NEG_INFINITY, f64::max);
        let bounds = padded(min, max);

        self.draw_scale(&painter, plot, bounds);

        let slot_width = plot.width() / summaries.len() as f32;
        for (i, (group, summary)) in summaries.iter().enumerate() {
            let center_x = plot.left() + slot_width * (i as f32 + 0.5);
            self.draw_box(&painter, plot, bounds, center_x, slot_width, summary);

            painter.text(
                Pos2::new(center_x, rect.bottom() - LABEL_BAND_HEIGHT / 2.0),
                egui::Align2::CENTER_CENTER,
                &group.label,
                egui::FontId::proportional(10.0),
                self.colors.text_label_color(),
            );
        }
    }

    /// Horizontal grid lines with value labels.
    fn draw_scale(&self, painter: &Painter, plot: Rect, bounds: (f64, f64)) {
        let stroke = Stroke::new(0.5, self.colors.grid_color());
        let span = bounds.1 - bounds.0;
        if span <= 0.0 {
            return;
        }
        for i in 0..=4 {
            let value = bounds.0 + span * i as f64 / 4.0;
            let y = y_position(plot, bounds, value);
            painter.line_segment(
                [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
                stroke,
            );
            painter.text(
                Pos2::new(plot.left() - 4.0, y),
                egui::Align2::RIGHT_CENTER,
                format!("{:.0}", value),
                egui::FontId::proportional(10.0),
                self.colors.text_dim_color(),
            );
        }
    }

    /// One box-and-whisker glyph.
    fn draw_box(
        &self,
        painter: &Painter,
        plot: Rect,
        bounds: (f64, f64),
        center_x: f32,
        slot_width: f32,
        summary: &Summary,
    ) {
        let stroke = Stroke::new(1.0, self.colors.box_stroke_color());
        let box_width = slot_width * BOX_WIDTH_FRACTION;
        let half = box_width / 2.0;
        let cap = box_width / 4.0;

        let y_min = y_position(plot, bounds, summary.min);
        let y_max = y_position(plot, bounds, summary.max);
        let y_q1 = y_position(plot, bounds, summary.quartiles.q1);
        let y_q3 = y_position(plot, bounds, summary.quartiles.q3);
        let y_median = y_position(plot, bounds, summary.quartiles.median);
        let y_mean = y_position(plot, bounds, summary.mean);

        // Whiskers with end caps
        painter.line_segment(
            [Pos2::new(center_x, y_min), Pos2::new(center_x, y_q1)],
            stroke,
        );
        painter.line_segment(
            [Pos2::new(center_x, y_q3), Pos2::new(center_x, y_max)],
            stroke,
        );
        for y in [y_min, y_max] {
            painter.line_segment(
                [Pos2::new(center_x - cap, y), Pos2::new(center_x + cap, y)],
                stroke,
            );
        }

        // Interquartile box
        let box_rect = Rect::from_min_max(
            Pos2::new(center_x - half, y_q3),
            Pos2::new(center_x + half, y_q1),
        );
        painter.rect_filled(box_rect, 2.0, self.colors.box_fill_color());
        painter.rect_stroke(box_rect, 2.0, stroke, egui::StrokeKind::Inside);

        // Median line across the box
        painter.line_segment(
            [
                Pos2::new(center_x - half, y_median),
                Pos2::new(center_x + half, y_median),
            ],
            Stroke::new(1.5, self.colors.box_stroke_color()),
        );

        // Mean marker
        painter.circle_filled(
            Pos2::new(center_x, y_mean),
            2.5,
            self.colors.mean_marker_color(),
        );
    }

    /// Per-group statistics table.
    fn draw_table(&self, ui: &mut egui::Ui, summaries: &[(&DistanceGroup, Summary)]) {
        egui::Grid::new("comparison_table")
            .striped(true)
            .min_col_width(70.0)
            .show(ui, |ui| {
                let header_color = self.colors.text_label_color();
                for title in ["Group", "Runs", "Mean", "Std dev", "Min", "Median", "Max"] {
                    ui.colored_label(header_color, title);
                }
                ui.end_row();

                for (group, summary) in summaries {
                    ui.label(&group.label);
                    ui.label(format!("{}", summary.count));
                    ui.label(format!("{:.2}", summary.mean));
                    ui.label(
                        summary
                            .std_dev
                            .map(|sd| format!("{:.2}", sd))
                            .unwrap_or_else(|| "—".to_string()),
                    );
                    ui.label(format!("{:.2}", summary.min));
                    ui.label(format!("{:.2}", summary.quartiles.median));
                    ui.label(format!("{:.2}", summary.max));
                    ui.end_row();
                }
            });
    }
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

/// Pad the shared scale so whiskers stay clear of the panel edges.
fn padded(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 { span * 0.08 } else { 1.0 };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_widens_range() {
        let (lo, hi) = padded(10.0, 20.0);
        assert!(lo < 10.0 && hi > 20.0);
    }

    #[test]
    fn test_padded_degenerate_range() {
        let (lo, hi) = padded(5.0, 5.0);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_y_position_orientation() {
        let plot = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 100.0));
        let low = y_position(plot, (0.0, 10.0), 0.0);
        let high = y_position(plot, (0.0, 10.0), 10.0);
        assert!(high < low);
    }
}
