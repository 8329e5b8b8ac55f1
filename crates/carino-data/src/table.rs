//! Wide factor × period returns table with explicit missing-value cells.
//!
//! The table is the single owned artifact flowing through the pipeline:
//! constructed once from long-format records, optionally restricted to one
//! factor, then extended with appended smoothing columns. Original period
//! columns are never overwritten.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation in long format: a factor's return over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    /// Factor (country or category) the return belongs to.
    pub factor: String,

    /// Period-end date of the observation.
    pub period: NaiveDate,

    /// Periodic return fraction; `None` when no return was recorded.
    pub value: Option<f64>,
}

/// A column appended by the smoothing engine, labeled by aggregation bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedColumn {
    /// Human-readable bucket label, e.g. `smoothed_2021-Q3`.
    pub label: String,

    /// One value per table row, in row order.
    pub values: Vec<Option<f64>>,
}

/// Rectangular table of periodic returns: rows keyed by factor name, columns
/// keyed by period-end date, cell = `Option<f64>` return fraction.
///
/// Construction coerces cells that are exactly `0.0` to `None`: in the
/// source data a zero return is indistinguishable from "no return recorded",
/// and the smoothing adjustment is undefined at zero either way.
///
/// Factors are held in ascending name order and periods in ascending date
/// order, as a pivot sorts both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsTable {
    factors: Vec<String>,
    periods: Vec<NaiveDate>,
    values: Vec<Vec<Option<f64>>>,
    smoothed: Vec<SmoothedColumn>,
}

impl ReturnsTable {
    /// Pivot long-format records into a wide table.
    ///
    /// Factors and periods are deduplicated and sorted; a record for a
    /// (factor, period) pair that already holds a value overwrites it. The
    /// input boundary is specified to deliver deduplicated records, so the
    /// table does not aggregate duplicates. Zero values become missing.
    pub fn from_records(records: &[ReturnRecord]) -> Self {
        let factors: Vec<String> = records
            .iter()
            .map(|r| r.factor.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let periods: Vec<NaiveDate> = records
            .iter()
            .map(|r| r.period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut values = vec![vec![None; periods.len()]; factors.len()];
        for record in records {
            // Both lookups succeed: the axes were built from the same records.
            let (Ok(row), Ok(col)) = (
                factors.binary_search(&record.factor),
                periods.binary_search(&record.period),
            ) else {
                continue;
            };
            values[row][col] = record.value.filter(|v| *v != 0.0);
        }

        Self {
            factors,
            periods,
            values,
            smoothed: Vec::new(),
        }
    }

    /// Factor names, one per row, in row order.
    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    /// Period-end dates, one per original column, in column order.
    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    /// Columns appended by the smoothing engine, in append order.
    pub fn smoothed_columns(&self) -> &[SmoothedColumn] {
        &self.smoothed
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.factors.len()
    }

    /// Number of original period columns.
    pub fn n_periods(&self) -> usize {
        self.periods.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// The raw return cells of one row, in period order.
    pub fn row(&self, index: usize) -> &[Option<f64>] {
        &self.values[index]
    }

    /// Cell lookup by factor name and period date, `None` when either axis
    /// label is absent or the cell is missing.
    pub fn value(&self, factor: &str, period: NaiveDate) -> Option<f64> {
        let row = self.factors.iter().position(|f| f == factor)?;
        let col = self.periods.iter().position(|p| *p == period)?;
        self.values[row][col]
    }

    /// Restrict the table to the single row matching `factor`.
    ///
    /// When no row matches, the table is left empty rather than erroring;
    /// the degenerate case surfaces downstream as empty output.
    pub fn retain_factor(&mut self, factor: &str) {
        match self.factors.iter().position(|f| f == factor) {
            Some(row) => {
                self.factors = vec![self.factors[row].clone()];
                self.values = vec![std::mem::take(&mut self.values[row])];
                for column in &mut self.smoothed {
                    column.values = vec![column.values[row]];
                }
            }
            None => {
                self.factors.clear();
                self.values.clear();
                for column in &mut self.smoothed {
                    column.values.clear();
                }
            }
        }
    }

    /// Append a smoothed column. Original period columns are untouched.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold exactly one entry per row.
    pub fn push_column(&mut self, label: String, values: Vec<Option<f64>>) {
        assert_eq!(
            values.len(),
            self.n_rows(),
            "appended column must hold one value per row"
        );
        self.smoothed.push(SmoothedColumn { label, values });
    }
}
