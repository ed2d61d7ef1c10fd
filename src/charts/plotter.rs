//! Chart Plotter Module
//! Builds the dashboard's interactive charts with egui_plot.

use crate::stats::{Histogram, ValueCount};
use chrono::{Duration, NaiveDate};
use egui::Color32;
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

/// Accent color for single-series charts
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(231, 76, 60),   // Red
];

/// Creates the dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a categorical bar chart, one bar per [`ValueCount`] in the order
    /// given, with category names on the x-axis.
    pub fn draw_value_counts(
        ui: &mut egui::Ui,
        id: &str,
        counts: &[ValueCount],
        x_label: &str,
        height: f32,
        color: Color32,
    ) {
        let x_labels: Vec<String> = counts.iter().map(|vc| vc.value.clone()).collect();

        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, vc)| {
                Bar::new(i as f64, vc.count as f64)
                    .width(0.6)
                    .name(&vc.value)
                    .fill(color.gamma_multiply(0.8))
            })
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("Count")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color));
            });
    }

    /// Draw a histogram of a numeric column as contiguous bars.
    pub fn draw_histogram(
        ui: &mut egui::Ui,
        id: &str,
        hist: &Histogram,
        x_label: &str,
        height: f32,
    ) {
        let bars: Vec<Bar> = hist
            .bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center, bin.count as f64)
                    .width(hist.bin_width)
                    .fill(ACCENT_COLOR.gamma_multiply(0.7))
            })
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(ACCENT_COLOR));
            });
    }

    /// Draw the time-difference line chart. Points carry days-since-epoch on
    /// the x-axis and are labeled as calendar dates.
    pub fn draw_time_series(ui: &mut egui::Ui, id: &str, points: &[[f64; 2]], height: f32) {
        let line_points: PlotPoints = points.iter().copied().collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label("Time Difference (seconds)")
            .x_axis_formatter(|mark, _range| {
                let date = NaiveDate::default() + Duration::days(mark.value.round() as i64);
                date.format("%Y-%m-%d").to_string()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(line_points).color(ACCENT_COLOR).width(1.5));
            });
    }
}
