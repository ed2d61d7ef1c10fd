//! GUI module - user interface components

mod app;
mod dashboard_view;
mod filter_panel;

pub use app::DashboardApp;
pub use dashboard_view::{DashboardData, DashboardView};
pub use filter_panel::{FilterPanel, FilterPanelAction};
