//! Main Application Window
//! Filter panel on the left, dashboard on the right. Every filter change
//! triggers one synchronous recomputation of the filtered view and all
//! standing aggregates.

use crate::data::{apply_filters, ActivityLog};
use crate::export;
use crate::gui::{DashboardData, DashboardView, FilterPanel, FilterPanelAction};
use crate::stats::Aggregates;
use egui::SidePanel;

pub struct DashboardApp {
    log: ActivityLog,
    filter_panel: FilterPanel,
    dashboard: DashboardView,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, log: ActivityLog) -> Self {
        let filter_panel = FilterPanel::new(&log);
        let mut app = Self {
            log,
            filter_panel,
            dashboard: DashboardView::new(),
        };
        app.recompute();
        app
    }

    /// Pull-based pipeline: current filters in, filtered view plus
    /// aggregates out. The loaded log itself is never touched.
    fn recompute(&mut self) {
        let params = self.filter_panel.filter_params();
        let result = apply_filters(self.log.dataframe(), &params)
            .and_then(|filtered| Ok((Aggregates::compute(&filtered)?, filtered)));

        match result {
            Ok((aggregates, filtered)) => {
                self.filter_panel
                    .set_status(&format!("{} rows match", filtered.height()));
                self.dashboard.set_data(DashboardData {
                    filtered,
                    aggregates,
                });
            }
            Err(e) => {
                log::error!("recomputation failed: {e}");
                self.filter_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Export the current filtered view. Failures are reported in the status
    /// line and never end the session.
    fn handle_export(&mut self) {
        let Some(filtered) = self.dashboard.filtered() else {
            self.filter_panel.set_status("No data to export");
            return;
        };

        match export::write_filtered(filtered, export::EXPORT_PATH) {
            Ok(()) => {
                log::info!(
                    "exported {} rows to {}",
                    filtered.height(),
                    export::EXPORT_PATH
                );
                self.filter_panel.set_status(&format!(
                    "Exported {} rows to {}",
                    filtered.height(),
                    export::EXPORT_PATH
                ));
            }
            Err(e) => {
                log::warn!("export failed: {e}");
                self.filter_panel.set_status(&format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("filter_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.filter_panel.show(ui);

                    match action {
                        FilterPanelAction::FiltersChanged => self.recompute(),
                        FilterPanelAction::ExportCsv => self.handle_export(),
                        FilterPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
