//! Input boundary: long-format CSV → [`ReturnsTable`].
//!
//! The source file holds one observation per line with `COUNTRY`,
//! `REF_DATE` (ISO date) and `TOTAL` columns. Reading and pivoting happen
//! here; the smoothing engine only ever sees the wide table.

use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::{DataError, Result};
use crate::table::{ReturnRecord, ReturnsTable};

/// Input column holding the factor (country/category) name.
pub const FACTOR_COLUMN: &str = "COUNTRY";

/// Input column holding the period-end date.
pub const DATE_COLUMN: &str = "REF_DATE";

/// Input column holding the periodic return fraction.
pub const VALUE_COLUMN: &str = "TOTAL";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read a long-format returns CSV and pivot it into a [`ReturnsTable`].
pub fn read_returns_csv(path: impl AsRef<Path>) -> Result<ReturnsTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;
    returns_from_frame(&df)
}

/// Pivot a long-format frame (`COUNTRY`, `REF_DATE`, `TOTAL`) into a
/// [`ReturnsTable`].
///
/// A null `TOTAL` becomes a missing cell; null factor or date values are
/// input errors, as is a date that does not parse as `%Y-%m-%d`.
pub fn returns_from_frame(df: &DataFrame) -> Result<ReturnsTable> {
    let factors = df.column(FACTOR_COLUMN)?.str()?;
    let dates = df.column(DATE_COLUMN)?.str()?;
    let totals = df.column(VALUE_COLUMN)?.cast(&DataType::Float64)?;
    let totals = totals.f64()?;

    let mut records = Vec::with_capacity(df.height());
    for (row, ((factor, date), value)) in factors
        .into_iter()
        .zip(dates)
        .zip(totals)
        .enumerate()
    {
        let factor = factor.ok_or(DataError::MissingField {
            column: FACTOR_COLUMN,
            row,
        })?;
        let date = date.ok_or(DataError::MissingField {
            column: DATE_COLUMN,
            row,
        })?;
        let period = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| DataError::InvalidDate(date.to_string()))?;
        records.push(ReturnRecord {
            factor: factor.to_string(),
            period,
            value,
        });
    }

    Ok(ReturnsTable::from_records(&records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_frame() -> DataFrame {
        df!(
            FACTOR_COLUMN => ["Germany", "France", "Germany", "France"],
            DATE_COLUMN => ["2021-01-31", "2021-01-31", "2021-02-28", "2021-02-28"],
            VALUE_COLUMN => [0.01, 0.02, 0.03, -0.01]
        )
        .unwrap()
    }

    #[test]
    fn test_pivot_from_frame() {
        let table = returns_from_frame(&long_frame()).unwrap();
        assert_eq!(table.factors(), &["France", "Germany"]);
        assert_eq!(table.n_periods(), 2);
        assert_eq!(table.row(0), &[Some(0.02), Some(-0.01)]);
        assert_eq!(table.row(1), &[Some(0.01), Some(0.03)]);
    }

    #[test]
    fn test_null_total_becomes_missing_cell() {
        let df = df!(
            FACTOR_COLUMN => ["France", "France"],
            DATE_COLUMN => ["2021-01-31", "2021-02-28"],
            VALUE_COLUMN => [Some(0.02), None::<f64>]
        )
        .unwrap();
        let table = returns_from_frame(&df).unwrap();
        assert_eq!(table.row(0), &[Some(0.02), None]);
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let df = df!(
            FACTOR_COLUMN => ["France"],
            DATE_COLUMN => ["Jan 2021"],
            VALUE_COLUMN => [0.02]
        )
        .unwrap();
        let err = returns_from_frame(&df).unwrap_err();
        assert!(matches!(err, DataError::InvalidDate(_)));
    }

    #[test]
    fn test_read_returns_csv_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("carino_data_load_test.csv");
        std::fs::write(
            &path,
            "COUNTRY,REF_DATE,TOTAL\n\
             France,2021-01-31,0.02\n\
             Germany,2021-01-31,0.01\n\
             France,2021-02-28,-0.01\n",
        )
        .unwrap();

        let table = read_returns_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.factors(), &["France", "Germany"]);
        assert_eq!(table.n_periods(), 2);
        assert_eq!(
            table.value("France", NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()),
            Some(-0.01)
        );
        assert_eq!(
            table.value("Germany", NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()),
            None
        );
    }
}
