//! Dashboard View Widget
//! Central panel: metric cards, data table, charts and statistics over the
//! currently filtered view.

use crate::charts::ChartPlotter;
use crate::stats::{describe, histogram, numeric_values, Aggregates, ColumnSummary, Histogram};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::*;

/// Personality trait columns selectable for the histogram
pub const TRAIT_COLUMNS: [&str; 5] = ["O", "C", "E", "A", "N"];

const CHART_HEIGHT: f32 = 260.0;
const TABLE_ROW_HEIGHT: f32 = 18.0;
const TABLE_CELL_WIDTH: f32 = 92.0;

/// One recomputation result: the filtered view plus its aggregates.
#[derive(Clone)]
pub struct DashboardData {
    pub filtered: DataFrame,
    pub aggregates: Aggregates,
}

/// Central scrollable dashboard. Holds the latest recomputation and the
/// presentation-only state (trait selection, detailed-stats toggle).
pub struct DashboardView {
    data: Option<DashboardData>,
    selected_trait: String,
    show_details: bool,
    /// Cached on-demand describe() result, cleared on every filter change.
    details: Option<Vec<ColumnSummary>>,
    /// Cached histogram for the selected trait, cleared when the filter or
    /// the trait selection changes.
    trait_hist: Option<Histogram>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            data: None,
            selected_trait: TRAIT_COLUMNS[0].to_string(),
            show_details: false,
            details: None,
            trait_hist: None,
        }
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh recomputation result.
    pub fn set_data(&mut self, data: DashboardData) {
        self.data = Some(data);
        self.details = None;
        self.trait_hist = None;
    }

    /// Switch the histogram to another trait column.
    fn select_trait(&mut self, name: &str) {
        if self.selected_trait != name {
            self.selected_trait = name.to_string();
            self.trait_hist = None;
        }
    }

    /// Histogram of the selected trait over the current view, computed once
    /// per (filter change, trait selection).
    fn trait_histogram(&mut self, data: &DashboardData) -> &Histogram {
        let selected = self.selected_trait.clone();
        self.trait_hist.get_or_insert_with(|| {
            let values = numeric_values(&data.filtered, &selected).unwrap_or_default();
            histogram(&values, 20)
        })
    }

    /// The currently displayed filtered view, if any.
    pub fn filtered(&self) -> Option<&DataFrame> {
        self.data.as_ref().map(|data| &data.filtered)
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui) {
        // DataFrame clones are cheap (shared buffers); taking one here keeps
        // the widget state freely mutable below.
        let Some(data) = self.data.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        if self.show_details && self.details.is_none() {
            match describe(&data.filtered) {
                Ok(details) => self.details = Some(details),
                Err(e) => {
                    log::warn!("detailed statistics failed: {e}");
                    self.details = Some(Vec::new());
                }
            }
        }

        ScrollArea::vertical()
            .id_salt("dashboard")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(5.0);
                ui.label(RichText::new("Employee Activity Dashboard").size(22.0).strong());
                ui.add_space(10.0);

                self.draw_metric_cards(ui, &data);
                ui.add_space(15.0);

                ui.collapsing(RichText::new("Filtered Data").size(15.0).strong(), |ui| {
                    Self::draw_data_table(ui, &data.filtered);
                });
                ui.add_space(15.0);

                ui.label(
                    RichText::new("Time Difference Over Time")
                        .size(15.0)
                        .strong(),
                );
                ChartPlotter::draw_time_series(
                    ui,
                    "time_series",
                    &data.aggregates.time_series,
                    CHART_HEIGHT,
                );
                ui.add_space(15.0);

                self.draw_trait_histogram(ui, &data);
                ui.add_space(15.0);

                ui.label(RichText::new("Department Analysis").size(15.0).strong());
                ui.add_space(5.0);
                Self::draw_department_table(ui, &data);
                ui.add_space(15.0);

                ui.label(
                    RichText::new("User Activity Breakdown")
                        .size(15.0)
                        .strong(),
                );
                ChartPlotter::draw_value_counts(
                    ui,
                    "user_activity",
                    &data.aggregates.user_activity,
                    "User",
                    CHART_HEIGHT,
                    crate::charts::ACCENT_COLOR,
                );
                ui.add_space(15.0);

                ui.label(
                    RichText::new("File Operations Analysis")
                        .size(15.0)
                        .strong(),
                );
                ui.add_space(5.0);
                ui.columns(2, |columns| {
                    columns[0].label(RichText::new("File Extensions Distribution").strong());
                    ChartPlotter::draw_value_counts(
                        &mut columns[0],
                        "extension_counts",
                        &data.aggregates.extension_counts,
                        "Extension",
                        200.0,
                        crate::charts::PALETTE[1],
                    );

                    columns[1].label(RichText::new("Drive Letter Usage").strong());
                    ChartPlotter::draw_value_counts(
                        &mut columns[1],
                        "driveletter_counts",
                        &data.aggregates.driveletter_counts,
                        "Drive",
                        200.0,
                        crate::charts::PALETTE[3],
                    );
                });
                ui.add_space(15.0);

                ui.label(RichText::new("Advanced Statistics").size(15.0).strong());
                ui.checkbox(&mut self.show_details, "Show detailed statistics");
                if self.show_details {
                    if let Some(details) = &self.details {
                        Self::draw_describe_table(ui, details);
                    }
                }
                ui.add_space(20.0);
            });
    }

    fn draw_metric_cards(&self, ui: &mut egui::Ui, data: &DashboardData) {
        let summary = &data.aggregates.summary;
        ui.horizontal(|ui| {
            Self::metric_card(ui, "Total Records", summary.total_records.to_string());
            Self::metric_card(ui, "Unique Users", summary.unique_users.to_string());
            Self::metric_card(ui, "Unique Projects", summary.unique_projects.to_string());
        });
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(150.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(value)
                            .size(24.0)
                            .strong()
                            .color(Color32::from_rgb(100, 149, 237)),
                    );
                    ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                });
            });
    }

    /// Virtualized table over the filtered rows.
    fn draw_data_table(ui: &mut egui::Ui, df: &DataFrame) {
        let columns = df.get_columns();

        ui.horizontal(|ui| {
            for column in columns {
                ui.add_sized(
                    [TABLE_CELL_WIDTH, TABLE_ROW_HEIGHT],
                    egui::Label::new(RichText::new(column.name().as_str()).strong().size(11.0)),
                );
            }
        });
        ui.separator();

        ScrollArea::vertical()
            .id_salt("data_table")
            .max_height(280.0)
            .show_rows(ui, TABLE_ROW_HEIGHT, df.height(), |ui, row_range| {
                for row in row_range {
                    ui.horizontal(|ui| {
                        for column in columns {
                            ui.add_sized(
                                [TABLE_CELL_WIDTH, TABLE_ROW_HEIGHT],
                                egui::Label::new(
                                    RichText::new(Self::cell_text(column, row)).size(11.0),
                                ),
                            );
                        }
                    });
                }
            });

        ui.add_space(3.0);
        ui.label(
            RichText::new(format!("{} rows", df.height()))
                .size(10.0)
                .color(Color32::GRAY),
        );
    }

    fn cell_text(column: &Column, row: usize) -> String {
        column
            .as_materialized_series()
            .get(row)
            .map(|value| {
                if value.is_null() {
                    String::new()
                } else {
                    value.to_string().trim_matches('"').to_string()
                }
            })
            .unwrap_or_default()
    }

    fn draw_trait_histogram(&mut self, ui: &mut egui::Ui, data: &DashboardData) {
        ui.label(
            RichText::new("Personality Traits Distribution")
                .size(15.0)
                .strong(),
        );
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Select Trait:");
            egui::ComboBox::from_id_salt("trait_select")
                .width(80.0)
                .selected_text(&self.selected_trait)
                .show_ui(ui, |ui| {
                    for name in TRAIT_COLUMNS {
                        if ui
                            .selectable_label(self.selected_trait == name, name)
                            .clicked()
                        {
                            self.select_trait(name);
                        }
                    }
                });
        });

        let hist = self.trait_histogram(data).clone();
        ChartPlotter::draw_histogram(
            ui,
            "trait_histogram",
            &hist,
            &self.selected_trait,
            CHART_HEIGHT,
        );
    }

    fn draw_department_table(ui: &mut egui::Ui, data: &DashboardData) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("department_table")
                    .striped(true)
                    .min_col_width(100.0)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Department").strong().size(11.0));
                        ui.label(RichText::new("Unique Users").strong().size(11.0));
                        ui.label(RichText::new("Unique Projects").strong().size(11.0));
                        ui.label(RichText::new("Mean Time Diff (s)").strong().size(11.0));
                        ui.end_row();

                        for row in &data.aggregates.department_table {
                            ui.label(RichText::new(&row.department).size(11.0));
                            ui.label(RichText::new(row.unique_users.to_string()).size(11.0));
                            ui.label(RichText::new(row.unique_projects.to_string()).size(11.0));
                            ui.label(
                                RichText::new(format!("{:.2}", row.mean_time_diff)).size(11.0),
                            );
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_describe_table(ui: &mut egui::Ui, details: &[ColumnSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("describe_table")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in [
                            "Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max",
                        ] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for summary in details {
                            ui.label(RichText::new(&summary.column).size(11.0));
                            ui.label(RichText::new(summary.count.to_string()).size(11.0));
                            for value in [
                                summary.mean,
                                summary.std,
                                summary.min,
                                summary.q25,
                                summary.median,
                                summary.q75,
                                summary.max,
                            ] {
                                ui.label(RichText::new(format!("{value:.3}")).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
