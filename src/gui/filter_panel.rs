//! Filter Panel Widget
//! Left side panel with the date range, user and department filters.

use crate::data::{ActivityLog, FilterParams};
use chrono::NaiveDate;
use egui::{Color32, RichText, ScrollArea};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Actions triggered by the filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPanelAction {
    None,
    FiltersChanged,
    ExportCsv,
}

/// Left side panel holding the current filter selections. Defaults mirror the
/// loaded log: full date range, every user and department selected.
pub struct FilterPanel {
    users: Vec<String>,
    departments: Vec<String>,
    user_selected: Vec<bool>,
    dept_selected: Vec<bool>,
    start_input: String,
    end_input: String,
    start: NaiveDate,
    end: NaiveDate,
    data_min: NaiveDate,
    data_max: NaiveDate,
    status: String,
}

impl FilterPanel {
    pub fn new(log: &ActivityLog) -> Self {
        let (data_min, data_max) = log
            .date_range()
            .unwrap_or((NaiveDate::default(), NaiveDate::default()));
        let users = log.unique_users();
        let departments = log.unique_departments();

        Self {
            user_selected: vec![true; users.len()],
            dept_selected: vec![true; departments.len()],
            users,
            departments,
            start_input: data_min.format(DATE_FORMAT).to_string(),
            end_input: data_max.format(DATE_FORMAT).to_string(),
            start: data_min,
            end: data_max,
            data_min,
            data_max,
            status: "Ready".to_string(),
        }
    }

    /// Current predicates as a value the pipeline consumes.
    pub fn filter_params(&self) -> FilterParams {
        let mut params = FilterParams::new(self.start, self.end);
        params.users = self
            .users
            .iter()
            .zip(self.user_selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(user, _)| user.clone())
            .collect();
        params.departments = self
            .departments
            .iter()
            .zip(self.dept_selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(dept, _)| dept.clone())
            .collect();
        params
    }

    /// Set the status line shown below the export button.
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> FilterPanelAction {
        let mut action = FilterPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Activity Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Filters").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        if self.date_field(ui, "From:", true) {
            action = FilterPanelAction::FiltersChanged;
        }
        ui.add_space(3.0);
        if self.date_field(ui, "To:", false) {
            action = FilterPanelAction::FiltersChanged;
        }

        ui.add_space(3.0);
        ui.label(
            RichText::new(format!(
                "Data covers {} to {}",
                self.data_min.format(DATE_FORMAT),
                self.data_max.format(DATE_FORMAT)
            ))
            .size(10.0)
            .color(Color32::GRAY),
        );

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Users Section =====
        ui.label(RichText::new("👤 Users").size(14.0).strong());
        ui.add_space(5.0);
        if Self::checkbox_list(ui, "users", &self.users, &mut self.user_selected) {
            action = FilterPanelAction::FiltersChanged;
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Departments Section =====
        ui.label(RichText::new("🏢 Departments").size(14.0).strong());
        ui.add_space(5.0);
        if Self::checkbox_list(
            ui,
            "departments",
            &self.departments,
            &mut self.dept_selected,
        ) {
            action = FilterPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("💾 Export Filtered Data").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add(button).clicked() {
                action = FilterPanelAction::ExportCsv;
            }
        });

        ui.add_space(8.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// One labeled date input. Returns true when the field parsed to a new
    /// date; invalid text keeps the last valid value and turns the hint red.
    fn date_field(&mut self, ui: &mut egui::Ui, label: &str, is_start: bool) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.add_sized([45.0, 20.0], egui::Label::new(label));

            let input = if is_start {
                &mut self.start_input
            } else {
                &mut self.end_input
            };
            let response = ui.add_sized([110.0, 20.0], egui::TextEdit::singleline(input));
            let parsed = NaiveDate::parse_from_str(input, DATE_FORMAT);

            if response.changed() {
                if let Ok(date) = parsed {
                    let target = if is_start {
                        &mut self.start
                    } else {
                        &mut self.end
                    };
                    if *target != date {
                        *target = date;
                        changed = true;
                    }
                }
            }

            if parsed.is_err() {
                ui.label(
                    RichText::new(DATE_FORMAT.replace('%', ""))
                        .size(10.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
        });

        changed
    }

    /// Scrollable checkbox multiselect with Select All / Clear All. Returns
    /// true when any selection changed.
    fn checkbox_list(
        ui: &mut egui::Ui,
        id: &str,
        values: &[String],
        selected: &mut [bool],
    ) -> bool {
        let mut changed = false;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id.to_string())
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for (i, value) in values.iter().enumerate() {
                            if i < selected.len() && ui.checkbox(&mut selected[i], value).changed()
                            {
                                changed = true;
                            }
                        }
                    });
            });

        ui.add_space(3.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                selected.iter_mut().for_each(|v| *v = true);
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                selected.iter_mut().for_each(|v| *v = false);
                changed = true;
            }
        });

        changed
    }
}
