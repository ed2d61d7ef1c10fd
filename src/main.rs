//! Activity Dashboard - Employee Activity Log Explorer
//!
//! Loads a tabular activity log once at startup, then lets the operator
//! filter it by date range, users and departments while the dashboard
//! recomputes metrics and charts over the filtered subset.

mod charts;
mod data;
mod export;
mod gui;
mod stats;

use anyhow::Context;
use data::ActivityLog;
use eframe::egui;
use gui::DashboardApp;

const DEFAULT_DATA_PATH: &str = "activity_log.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    // A load failure is fatal; the session holds the log read-only from here.
    let log = ActivityLog::load(&path)
        .with_context(|| format!("failed to load activity log from {path}"))?;
    log::info!("loaded {} activity records from {path}", log.row_count());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Activity Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Activity Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, log)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
