//! Charts module - chart construction

mod plotter;

pub use plotter::{ChartPlotter, ACCENT_COLOR, PALETTE};
