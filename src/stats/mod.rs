//! Stats module - aggregates over the filtered view

mod aggregator;

pub use aggregator::{
    describe, histogram, numeric_values, value_counts, Aggregates, ColumnSummary, DepartmentRow,
    Histogram, SummaryMetrics, ValueCount,
};
