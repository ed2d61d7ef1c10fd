//! CSV Export Module
//! Writes the currently filtered view to disk on explicit operator action.
//!
//! Export failures are reported back to the filter panel status line; they
//! never terminate the session.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Fixed relative destination for the filtered view.
pub const EXPORT_PATH: &str = "filtered_data.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create {0}: {1}")]
    Create(String, #[source] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Write the filtered view as CSV: full column set, header row, no index
/// column. An empty view produces a header-only file.
pub fn write_filtered(df: &DataFrame, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| ExportError::Create(path.display().to_string(), e))?;

    let mut df = df.clone();
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_df() -> DataFrame {
        let epoch = NaiveDate::default();
        let days: Vec<i32> = [1, 2]
            .iter()
            .map(|d| {
                NaiveDate::from_ymd_opt(2024, 1, *d)
                    .unwrap()
                    .signed_duration_since(epoch)
                    .num_days() as i32
            })
            .collect();
        DataFrame::new(vec![
            Int32Chunked::from_vec("date".into(), days)
                .into_date()
                .into_series()
                .into_column(),
            Column::new("user".into(), &["alice", "bob"]),
            Column::new("department".into(), &["A", "B"]),
            Column::new("time_diff".into(), &[1.5f64, 2.5]),
        ])
        .unwrap()
    }

    #[test]
    fn writes_filtered_rows_with_header() {
        let path = std::env::temp_dir().join("activity_dash_export_rows.csv");
        write_filtered(&sample_df(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,user,department,time_diff");
        assert!(lines[1].starts_with("2024-01-01,alice,A"));
    }

    #[test]
    fn empty_view_exports_header_only() {
        let path = std::env::temp_dir().join("activity_dash_export_empty.csv");
        write_filtered(&sample_df().head(Some(0)), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["date,user,department,time_diff"]);
    }

    #[test]
    fn unwritable_destination_is_a_reported_error() {
        let result = write_filtered(&sample_df(), "/nonexistent/dir/out.csv");
        assert!(matches!(result, Err(ExportError::Create(_, _))));
    }
}
