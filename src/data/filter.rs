//! Filter Pipeline Module
//! Applies the operator's date/user/department predicates to the loaded log.

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;

/// Filter predicates chosen in the sidebar.
///
/// A row is retained when its date lies in `[start, end]` (inclusive), its
/// user is in `users` AND its department is in `departments`. Empty selection
/// sets therefore yield an empty view, which is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub users: BTreeSet<String>,
    pub departments: BTreeSet<String>,
}

impl FilterParams {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            users: BTreeSet::new(),
            departments: BTreeSet::new(),
        }
    }
}

/// Retain exactly the rows satisfying all three predicates, preserving the
/// original row order. Rows with a null date, user or department cannot
/// satisfy a predicate and are dropped.
pub fn apply_filters(df: &DataFrame, params: &FilterParams) -> PolarsResult<DataFrame> {
    let dates = df.column("date")?.date()?;
    let users = df.column("user")?.str()?;
    let departments = df.column("department")?.str()?;

    let mut mask: Vec<bool> = Vec::with_capacity(df.height());
    for ((date, user), department) in dates
        .as_date_iter()
        .zip(users.into_iter())
        .zip(departments.into_iter())
    {
        let keep = match (date, user, department) {
            (Some(date), Some(user), Some(department)) => {
                date >= params.start
                    && date <= params.end
                    && params.users.contains(user)
                    && params.departments.contains(department)
            }
            _ => false,
        };
        mask.push(keep);
    }

    df.filter(&BooleanChunked::from_slice("mask".into(), &mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn date_column(dates: &[NaiveDate]) -> Column {
        let epoch = NaiveDate::default();
        let days: Vec<i32> = dates
            .iter()
            .map(|d| d.signed_duration_since(epoch).num_days() as i32)
            .collect();
        Int32Chunked::from_vec("date".into(), days)
            .into_date()
            .into_series()
            .into_column()
    }

    fn sample_df() -> DataFrame {
        let dates = [
            day(2024, 1, 1),
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 3),
            day(2024, 1, 4),
        ];
        DataFrame::new(vec![
            date_column(&dates),
            Column::new("user".into(), &["alice", "bob", "alice", "carol", "bob"]),
            Column::new("department".into(), &["A", "A", "B", "B", "B"]),
            Column::new(
                "projects".into(),
                &["apollo", "hermes", "apollo", "zeus", "hermes"],
            ),
            Column::new("time_diff".into(), &[10.0f64, 20.0, 30.0, 40.0, 50.0]),
        ])
        .unwrap()
    }

    fn all_params(df: &DataFrame, start: NaiveDate, end: NaiveDate) -> FilterParams {
        let mut params = FilterParams::new(start, end);
        params.users = df
            .column("user")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        params.departments = df
            .column("department")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        params
    }

    #[test]
    fn retains_only_rows_matching_all_predicates() {
        let df = sample_df();
        let mut params = all_params(&df, day(2024, 1, 1), day(2024, 1, 4));
        params.users = ["alice", "bob"].iter().map(|s| s.to_string()).collect();
        params.departments = std::iter::once("A".to_string()).collect();

        let filtered = apply_filters(&df, &params).unwrap();
        assert_eq!(filtered.height(), 2);

        let users = filtered.column("user").unwrap().str().unwrap();
        let departments = filtered.column("department").unwrap().str().unwrap();
        for (user, department) in users.into_iter().zip(departments.into_iter()) {
            assert!(params.users.contains(user.unwrap()));
            assert!(params.departments.contains(department.unwrap()));
        }
    }

    #[test]
    fn department_selection_example() {
        // Departments {A, A, B, B, B} filtered to {A} leaves exactly 2 rows.
        let df = sample_df();
        let mut params = all_params(&df, day(2024, 1, 1), day(2024, 1, 4));
        params.departments = std::iter::once("A".to_string()).collect();

        let filtered = apply_filters(&df, &params).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn date_interval_is_inclusive_at_both_ends() {
        let df = sample_df();
        let params = all_params(&df, day(2024, 1, 1), day(2024, 1, 3));

        let filtered = apply_filters(&df, &params).unwrap();
        // 2024-01-04 falls outside; both boundary dates are kept.
        assert_eq!(filtered.height(), 4);
    }

    #[test]
    fn single_day_interval_excludes_later_records() {
        let df = sample_df();
        let params = all_params(&df, day(2024, 1, 1), day(2024, 1, 1));

        let filtered = apply_filters(&df, &params).unwrap();
        assert_eq!(filtered.height(), 2);
        let dates = filtered.column("date").unwrap().date().unwrap();
        for date in dates.as_date_iter().flatten() {
            assert_eq!(date, day(2024, 1, 1));
        }
    }

    #[test]
    fn empty_selection_yields_empty_view_not_error() {
        let df = sample_df();
        let mut params = all_params(&df, day(2024, 1, 1), day(2024, 1, 4));
        params.users.clear();

        let filtered = apply_filters(&df, &params).unwrap();
        assert_eq!(filtered.height(), 0);
    }

    #[test]
    fn preserves_original_row_order() {
        let df = sample_df();
        let params = all_params(&df, day(2024, 1, 1), day(2024, 1, 4));

        let filtered = apply_filters(&df, &params).unwrap();
        let users: Vec<&str> = filtered
            .column("user")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(users, vec!["alice", "bob", "alice", "carol", "bob"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let df = sample_df();
        let mut params = all_params(&df, day(2024, 1, 2), day(2024, 1, 4));
        params.departments = std::iter::once("B".to_string()).collect();

        let first = apply_filters(&df, &params).unwrap();
        let second = apply_filters(&df, &params).unwrap();
        assert!(first.equals(&second));

        // The filter is a pure function of its inputs; the source is untouched.
        assert_eq!(df.height(), 5);
    }
}
