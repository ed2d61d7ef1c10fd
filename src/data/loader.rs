//! Activity Log Loader Module
//! Loads the activity CSV into memory and validates its schema using Polars.

use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Identifier columns the filter and aggregation paths match as strings.
const CATEGORICAL_COLUMNS: [&str; 5] =
    ["user", "department", "projects", "extension", "driveletter"];

/// Columns every activity log must carry.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "date",
    "user",
    "department",
    "projects",
    "time_diff",
    "extension",
    "driveletter",
    "O",
    "C",
    "E",
    "A",
    "N",
];

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required columns: {0}")]
    MissingColumns(String),
    #[error("Date column is not parseable as a date (found dtype {0})")]
    DateColumn(DataType),
}

/// The full activity log, loaded once at startup and immutable for the
/// lifetime of the process. Filtered views are derived from it on each
/// filter change; the log itself is never touched again.
pub struct ActivityLog {
    df: DataFrame,
}

impl ActivityLog {
    /// Load an activity CSV from disk.
    ///
    /// Validates the required column set and normalizes the `date` column to
    /// the `Date` dtype. Any failure here is fatal to startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();

        let df = LazyCsvReader::new(path.to_string_lossy().as_ref())
            .with_has_header(true)
            .with_try_parse_dates(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| df.column(name).is_err())
            .collect();
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns(missing.join(", ")));
        }

        let df = match df.column("date")?.dtype() {
            DataType::Date => df,
            DataType::Datetime(_, _) => df
                .lazy()
                .with_column(col("date").cast(DataType::Date))
                .collect()?,
            other => return Err(DataLoadError::DateColumn(other.clone())),
        };

        // Schema inference types numeric-looking identifiers as integers;
        // every downstream consumer matches these columns as strings.
        let df = df
            .lazy()
            .with_columns(CATEGORICAL_COLUMNS.map(|name| col(name).cast(DataType::String)))
            .collect()?;

        Ok(Self { df })
    }

    /// The full, immutable record set.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Sorted unique values of a string column.
    fn unique_values(&self, column: &str) -> Vec<String> {
        self.df
            .column(column)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut values: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                values.sort();
                values
            })
            .unwrap_or_default()
    }

    pub fn unique_users(&self) -> Vec<String> {
        self.unique_values("user")
    }

    pub fn unique_departments(&self) -> Vec<String> {
        self.unique_values("department")
    }

    /// Earliest and latest date in the log, used to seed the filter panel.
    /// `None` when the log has no rows with a date.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.df.column("date").ok()?.date().ok()?;
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for date in dates.as_date_iter().flatten() {
            bounds = Some(match bounds {
                None => (date, date),
                Some((min, max)) => (min.min(date), max.max(date)),
            });
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "date,user,department,projects,time_diff,extension,driveletter,O,C,E,A,N";

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_and_parses_dates() {
        let path = write_temp_csv(
            "activity_dash_loader_ok.csv",
            &format!(
                "{HEADER}\n\
                 2024-01-01,alice,eng,apollo,12.5,txt,C,0.1,0.2,0.3,0.4,0.5\n\
                 2024-01-02,bob,sales,hermes,3.0,doc,D,0.5,0.4,0.3,0.2,0.1\n"
            ),
        );

        let log = ActivityLog::load(&path).unwrap();
        assert_eq!(log.row_count(), 2);
        assert_eq!(
            log.dataframe().column("date").unwrap().dtype(),
            &DataType::Date
        );
        assert_eq!(
            log.unique_users(),
            vec!["alice".to_string(), "bob".to_string()]
        );
        assert_eq!(
            log.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
            ))
        );
    }

    #[test]
    fn numeric_identifier_columns_load_as_strings_and_filter() {
        let path = write_temp_csv(
            "activity_dash_loader_numeric_ids.csv",
            &format!(
                "{HEADER}\n\
                 2024-01-01,101,7,3001,1.5,7z,4,0,0,0,0,0\n\
                 2024-01-02,102,8,3002,2.5,7z,4,0,0,0,0,0\n"
            ),
        );

        let log = ActivityLog::load(&path).unwrap();
        for name in CATEGORICAL_COLUMNS {
            assert_eq!(
                log.dataframe().column(name).unwrap().dtype(),
                &DataType::String,
                "column {name} not normalized",
            );
        }
        assert_eq!(
            log.unique_users(),
            vec!["101".to_string(), "102".to_string()]
        );

        let mut params = crate::data::FilterParams::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        params.users = log.unique_users().into_iter().collect();
        params.departments = std::iter::once("7".to_string()).collect();

        let filtered = crate::data::apply_filters(log.dataframe(), &params).unwrap();
        assert_eq!(filtered.height(), 1);
        assert_eq!(
            crate::stats::value_counts(&filtered, "user").unwrap()[0].value,
            "101"
        );
    }

    #[test]
    fn rejects_missing_columns() {
        let path = write_temp_csv(
            "activity_dash_loader_missing.csv",
            "date,user\n2024-01-01,alice\n",
        );

        match ActivityLog::load(&path) {
            Err(DataLoadError::MissingColumns(cols)) => {
                assert!(cols.contains("department"));
                assert!(cols.contains("driveletter"));
            }
            other => panic!("expected MissingColumns, got {:?}", other.err()),
        }
    }

    #[test]
    fn rejects_unparseable_date_column() {
        let path = write_temp_csv(
            "activity_dash_loader_baddate.csv",
            &format!(
                "{HEADER}\n\
                 not-a-date,alice,eng,apollo,1.0,txt,C,0,0,0,0,0\n"
            ),
        );

        assert!(matches!(
            ActivityLog::load(&path),
            Err(DataLoadError::DateColumn(_))
        ));
    }

    #[test]
    fn rejects_unreadable_path() {
        assert!(matches!(
            ActivityLog::load("/nonexistent/activity.csv"),
            Err(DataLoadError::Csv(_))
        ));
    }
}
