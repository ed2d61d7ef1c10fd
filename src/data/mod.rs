//! Data module - activity log loading and filtering

mod filter;
mod loader;

pub use filter::{apply_filters, FilterParams};
pub use loader::{ActivityLog, DataLoadError, REQUIRED_COLUMNS};
