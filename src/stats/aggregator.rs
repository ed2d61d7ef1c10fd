//! Aggregation Module
//! Derived metrics, tables and chart series computed over a filtered view.
//!
//! Every aggregate is a pure function of the filtered frame and is
//! well-defined on an empty frame (zero counts, empty tables, NaN means).

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Headline metrics shown as cards at the top of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryMetrics {
    pub total_records: usize,
    pub unique_users: usize,
    pub unique_projects: usize,
}

/// One row of the department analysis table. Only departments with at least
/// one row in the filtered view are represented.
#[derive(Debug, Clone)]
pub struct DepartmentRow {
    pub department: String,
    pub unique_users: usize,
    pub unique_projects: usize,
    pub mean_time_diff: f64,
}

/// One bar of a categorical frequency chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: u32,
}

/// A single histogram bin, identified by its center.
#[derive(Debug, Clone)]
pub struct HistogramBin {
    pub center: f64,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub bin_width: f64,
}

/// Descriptive statistics for one numeric column (pandas-style `describe`).
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Everything the dashboard recomputes on a filter change, except the
/// on-demand detailed statistics (see [`describe`]).
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub summary: SummaryMetrics,
    pub department_table: Vec<DepartmentRow>,
    pub user_activity: Vec<ValueCount>,
    pub extension_counts: Vec<ValueCount>,
    pub driveletter_counts: Vec<ValueCount>,
    /// `(days since epoch, time_diff)` in original row order.
    pub time_series: Vec<[f64; 2]>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            bins: Vec::new(),
            bin_width: 0.0,
        }
    }
}

impl Aggregates {
    /// Compute all standing aggregates over a filtered view in one pass per
    /// aggregate. Each is independent and insensitive to row order.
    pub fn compute(df: &DataFrame) -> PolarsResult<Self> {
        Ok(Self {
            summary: SummaryMetrics::compute(df)?,
            department_table: department_table(df)?,
            user_activity: value_counts(df, "user")?,
            extension_counts: value_counts(df, "extension")?,
            driveletter_counts: value_counts(df, "driveletter")?,
            time_series: time_series(df)?,
        })
    }
}

impl SummaryMetrics {
    pub fn compute(df: &DataFrame) -> PolarsResult<Self> {
        Ok(Self {
            total_records: df.height(),
            unique_users: distinct_count(df, "user")?,
            unique_projects: distinct_count(df, "projects")?,
        })
    }
}

/// Distinct non-null values in a column.
fn distinct_count(df: &DataFrame, column: &str) -> PolarsResult<usize> {
    let col = df.column(column)?;
    let n = col.as_materialized_series().n_unique()?;
    // A null counts as a distinct value for polars but not for us.
    Ok(if col.null_count() > 0 { n - 1 } else { n })
}

/// Per-department distinct-user/project counts and mean `time_diff`, one row
/// per department present in the view, sorted by department name.
pub fn department_table(df: &DataFrame) -> PolarsResult<Vec<DepartmentRow>> {
    struct Acc {
        users: HashSet<String>,
        projects: HashSet<String>,
        time_sum: f64,
        time_count: usize,
    }

    let departments = df.column("department")?.str()?;
    let users = df.column("user")?.str()?;
    let projects = df.column("projects")?.str()?;
    let time_cast = df.column("time_diff")?.cast(&DataType::Float64)?;
    let time_diff = time_cast.f64()?;

    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();

    for i in 0..df.height() {
        let Some(department) = departments.get(i) else {
            continue;
        };
        let acc = groups.entry(department.to_string()).or_insert_with(|| Acc {
            users: HashSet::new(),
            projects: HashSet::new(),
            time_sum: 0.0,
            time_count: 0,
        });

        if let Some(user) = users.get(i) {
            acc.users.insert(user.to_string());
        }
        if let Some(project) = projects.get(i) {
            acc.projects.insert(project.to_string());
        }
        if let Some(v) = time_diff.get(i) {
            if !v.is_nan() {
                acc.time_sum += v;
                acc.time_count += 1;
            }
        }
    }

    Ok(groups
        .into_iter()
        .map(|(department, acc)| DepartmentRow {
            department,
            unique_users: acc.users.len(),
            unique_projects: acc.projects.len(),
            mean_time_diff: if acc.time_count > 0 {
                acc.time_sum / acc.time_count as f64
            } else {
                f64::NAN
            },
        })
        .collect())
}

/// Frequency of each distinct value in a string column, ordered by count
/// descending (ties by value ascending, for a stable bar order).
pub fn value_counts(df: &DataFrame, column: &str) -> PolarsResult<Vec<ValueCount>> {
    let values = df.column(column)?.str()?;

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut result: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    Ok(result)
}

/// `(date, time_diff)` points for the line chart, dates as fractional days
/// since the Unix epoch. Rows missing either value are skipped.
pub fn time_series(df: &DataFrame) -> PolarsResult<Vec<[f64; 2]>> {
    let epoch = NaiveDate::default();
    let dates = df.column("date")?.date()?;
    let time_cast = df.column("time_diff")?.cast(&DataType::Float64)?;
    let time_diff = time_cast.f64()?;

    Ok(dates
        .as_date_iter()
        .zip(time_diff.into_iter())
        .filter_map(|(date, value)| {
            let date = date?;
            let value = value?;
            let days = date.signed_duration_since(epoch).num_days() as f64;
            Some([days, value])
        })
        .collect())
}

/// Non-null, non-NaN values of a column cast to `f64`.
pub fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
    let cast = df.column(column)?.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Equal-width histogram over `values`. Empty input yields empty bins; a
/// degenerate range (all values equal) collapses to a single bin.
pub fn histogram(values: &[f64], nbins: usize) -> Histogram {
    if values.is_empty() || nbins == 0 {
        return Histogram::default();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return Histogram {
            bins: vec![HistogramBin {
                center: min,
                count: values.len() as u32,
            }],
            bin_width: 1.0,
        };
    }

    let bin_width = (max - min) / nbins as f64;
    let mut counts = vec![0u32; nbins];
    for &v in values {
        let idx = (((v - min) / bin_width) as usize).min(nbins - 1);
        counts[idx] += 1;
    }

    Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                center: min + (i as f64 + 0.5) * bin_width,
                count,
            })
            .collect(),
        bin_width,
    }
}

/// Descriptive statistics over every numeric column, computed on demand only
/// (enabling "detailed statistics" in the dashboard triggers this).
pub fn describe(df: &DataFrame) -> PolarsResult<Vec<ColumnSummary>> {
    let mut summaries = Vec::new();
    for column in df.get_columns() {
        if !matches!(
            column.dtype(),
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        ) {
            continue;
        }
        let values = numeric_values(df, column.name().as_str())?;
        summaries.push(ColumnSummary::from_values(
            column.name().to_string(),
            &values,
        ));
    }
    Ok(summaries)
}

impl ColumnSummary {
    /// Pandas-compatible descriptive statistics: sample std (NaN below two
    /// values), quartiles by linear interpolation.
    pub fn from_values(column: String, values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self {
                column,
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Self {
            column,
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: percentile(&sorted, 25.0),
            median: percentile(&sorted, 50.0),
            q75: percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }
}

/// Percentile of pre-sorted values using linear interpolation (NumPy
/// compatible).
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}
