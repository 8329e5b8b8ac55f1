//! The smoothing engine: filter, bucket, adjust, append.
//!
//! One engine instance owns one [`ReturnsTable`] for its whole life. The
//! run is a single synchronous pass: restrict to the selected factor,
//! group the period columns into aggregation buckets, compute the Carino
//! smoothed contribution per bucket and row, and append one labeled column
//! per bucket. Original columns are preserved in order.

use carino_data::ReturnsTable;
use chrono::{Datelike, NaiveDate};

use crate::adjustment::{compound_return, smoothed_bucket, sum_returns};
use crate::config::EngineConfig;
use crate::selection::PeriodSelection;

/// Label of the single column appended in inception-to-date mode.
pub const INCEPTION_LABEL: &str = "inception_to_date";

/// Applies the Carino logarithmic smoothing adjustment to a returns table.
#[derive(Debug)]
pub struct SmoothingEngine {
    table: ReturnsTable,
    period_selection: PeriodSelection,
}

impl SmoothingEngine {
    /// Build an engine around `table`.
    ///
    /// With a config, a non-empty factor selection restricts the table to
    /// that single row (an unknown factor leaves an empty table, not an
    /// error) and an empty period selection defaults to inception-to-date.
    /// Without a config the engine runs in raw mode: no filtering, no
    /// smoothing, the cleaned table is returned as-is by [`Self::smooth`].
    pub fn new(mut table: ReturnsTable, config: Option<EngineConfig>) -> Self {
        let period_selection = match config {
            Some(config) => {
                if let Some(name) = config.factor_selection.name() {
                    table.retain_factor(name);
                }
                match config.period_selection {
                    PeriodSelection::None => PeriodSelection::InceptionToDate,
                    other => other,
                }
            }
            None => PeriodSelection::None,
        };
        Self {
            table,
            period_selection,
        }
    }

    /// The aggregation mode this run will use.
    pub const fn period_selection(&self) -> PeriodSelection {
        self.period_selection
    }

    /// Run the smoothing pass and hand the table back.
    ///
    /// Quarterly and yearly modes sum the raw returns inside each bucket to
    /// obtain the bucket's multi-period return, while the single-period
    /// adjustments are taken from the raw ungrouped row; the bucket column
    /// holds the sum of the defined per-period contributions. The grouped
    /// total drives only the multi-period adjustment. Inception-to-date
    /// compounds the raw row into one spanning bucket.
    pub fn smooth(mut self) -> ReturnsTable {
        match self.period_selection {
            PeriodSelection::None => {}
            PeriodSelection::Quarterly => self.append_bucket_columns(
                |date| (date.year(), quarter_of(date)),
                |(year, quarter)| format!("smoothed_{year}-Q{quarter}"),
            ),
            PeriodSelection::Yearly => {
                self.append_bucket_columns(|date| date.year(), |year| format!("smoothed_{year}"));
            }
            PeriodSelection::InceptionToDate => self.append_inception_column(),
        }
        self.table
    }

    fn append_bucket_columns<K: PartialEq>(
        &mut self,
        bucket_key: impl Fn(NaiveDate) -> K,
        bucket_label: impl Fn(&K) -> String,
    ) {
        let buckets = group_periods(self.table.periods(), bucket_key);
        let mut columns: Vec<(String, Vec<Option<f64>>)> = buckets
            .iter()
            .map(|(key, _)| (bucket_label(key), Vec::with_capacity(self.table.n_rows())))
            .collect();

        for row_index in 0..self.table.n_rows() {
            let row = self.table.row(row_index);
            for ((_, period_indices), (_, values)) in buckets.iter().zip(&mut columns) {
                let cells: Vec<Option<f64>> =
                    period_indices.iter().map(|&i| row[i]).collect();
                values.push(smoothed_bucket(&cells, sum_returns(&cells)));
            }
        }

        for (label, values) in columns {
            self.table.push_column(label, values);
        }
    }

    fn append_inception_column(&mut self) {
        let mut values = Vec::with_capacity(self.table.n_rows());
        for row_index in 0..self.table.n_rows() {
            let row = self.table.row(row_index);
            values.push(smoothed_bucket(row, compound_return(row)));
        }
        self.table.push_column(INCEPTION_LABEL.to_string(), values);
    }
}

/// Calendar quarter of a date, 1 through 4.
fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Group column indices by bucket key, preserving the chronological order
/// of the (already ascending) period axis.
fn group_periods<K: PartialEq>(
    periods: &[NaiveDate],
    bucket_key: impl Fn(NaiveDate) -> K,
) -> Vec<(K, Vec<usize>)> {
    let mut buckets: Vec<(K, Vec<usize>)> = Vec::new();
    for (index, period) in periods.iter().enumerate() {
        let key = bucket_key(*period);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, indices)) => indices.push(index),
            None => buckets.push((key, vec![index])),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use carino_data::ReturnRecord;
    use rstest::rstest;

    use super::*;
    use crate::selection::FactorSelection;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table_from(rows: &[(&str, &[(NaiveDate, f64)])]) -> ReturnsTable {
        let mut records = Vec::new();
        for (factor, cells) in rows {
            for (period, value) in cells.iter() {
                records.push(ReturnRecord {
                    factor: factor.to_string(),
                    period: *period,
                    value: Some(*value),
                });
            }
        }
        ReturnsTable::from_records(&records)
    }

    fn month_ends_2021() -> [NaiveDate; 4] {
        [
            date(2021, 1, 31),
            date(2021, 2, 28),
            date(2021, 3, 31),
            date(2021, 4, 30),
        ]
    }

    fn two_factor_table() -> ReturnsTable {
        let periods = month_ends_2021();
        let values = [0.01, 0.02, -0.01, 0.03];
        let cells: Vec<(NaiveDate, f64)> =
            periods.iter().copied().zip(values.iter().copied()).collect();
        table_from(&[("France", &cells), ("Germany", &cells)])
    }

    fn config(period: &str, factor: &str) -> EngineConfig {
        EngineConfig::from_args(period, factor).unwrap()
    }

    /// Expected inception-to-date value for a fully defined row.
    fn expected_inception(returns: &[f64]) -> f64 {
        let compounded = returns.iter().fold(1.0, |g, r| g * (1.0 + r)) - 1.0;
        let multi = (1.0 + compounded).ln() / compounded;
        returns
            .iter()
            .map(|r| ((1.0 + r).ln() / r) * r / multi)
            .sum()
    }

    #[test]
    fn test_inception_to_date_end_to_end() {
        let table = SmoothingEngine::new(two_factor_table(), Some(config("I", ""))).smooth();

        // Original columns intact, one appended column, finite per row.
        assert_eq!(table.periods(), &month_ends_2021());
        assert_eq!(table.row(0), &[Some(0.01), Some(0.02), Some(-0.01), Some(0.03)]);
        assert_eq!(table.smoothed_columns().len(), 1);
        let column = &table.smoothed_columns()[0];
        assert_eq!(column.label, INCEPTION_LABEL);

        let expected = expected_inception(&[0.01, 0.02, -0.01, 0.03]);
        for value in &column.values {
            let value = value.expect("both rows have full data");
            assert!(value.is_finite());
            assert_relative_eq!(value, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_factor_filter_keeps_exactly_one_row() {
        let table =
            SmoothingEngine::new(two_factor_table(), Some(config("I", "France"))).smooth();
        assert_eq!(table.factors(), &["France"]);
        assert_eq!(table.smoothed_columns()[0].values.len(), 1);
    }

    #[test]
    fn test_unmatched_factor_yields_empty_output() {
        let table =
            SmoothingEngine::new(two_factor_table(), Some(config("I", "Norway"))).smooth();
        assert!(table.is_empty());
        assert_eq!(table.smoothed_columns()[0].values.len(), 0);
    }

    #[test]
    fn test_raw_mode_returns_table_unchanged() {
        let before = two_factor_table();
        let engine = SmoothingEngine::new(before.clone(), None);
        assert_eq!(engine.period_selection(), PeriodSelection::None);
        assert_eq!(engine.smooth(), before);
    }

    #[test]
    fn test_empty_period_selection_defaults_to_inception() {
        let engine = SmoothingEngine::new(two_factor_table(), Some(config("", "")));
        assert_eq!(engine.period_selection(), PeriodSelection::InceptionToDate);
    }

    #[test]
    fn test_idempotent_across_runs() {
        let first = SmoothingEngine::new(two_factor_table(), Some(config("Q", ""))).smooth();
        let second = SmoothingEngine::new(two_factor_table(), Some(config("Q", ""))).smooth();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("Q", 2)] // Q1 (Jan-Mar) and Q2 (Apr)
    #[case("Y", 1)]
    fn test_bucket_count_matches_span(#[case] period: &str, #[case] expected: usize) {
        let table = SmoothingEngine::new(two_factor_table(), Some(config(period, ""))).smooth();
        assert_eq!(table.smoothed_columns().len(), expected);
        assert_eq!(table.n_periods(), 4);
    }

    #[test]
    fn test_quarterly_labels_and_values() {
        let table = SmoothingEngine::new(two_factor_table(), Some(config("Q", ""))).smooth();
        let labels: Vec<&str> = table
            .smoothed_columns()
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, ["smoothed_2021-Q1", "smoothed_2021-Q2"]);

        // Q1 bucket: summed total drives the multi-period adjustment, raw
        // returns drive the per-period adjustments.
        let q1_returns = [0.01, 0.02, -0.01];
        let total: f64 = q1_returns.iter().sum();
        let multi = (1.0 + total).ln() / total;
        let expected: f64 = q1_returns.iter().map(|r| ((1.0 + r).ln() / r) * r / multi).sum();
        let q1 = table.smoothed_columns()[0].values[0].unwrap();
        assert_relative_eq!(q1, expected, epsilon = 1e-12);

        // Q2 holds a single period; its summed total equals the raw return,
        // so the smoothed value collapses to ln(1 + r) / multi_adjustment.
        let multi_q2 = 1.03_f64.ln() / 0.03;
        let q2 = table.smoothed_columns()[1].values[0].unwrap();
        assert_relative_eq!(q2, 1.03_f64.ln() / multi_q2, epsilon = 1e-12);
    }

    #[test]
    fn test_yearly_label_spans_calendar_years() {
        let cells_2021 = [(date(2021, 11, 30), 0.01), (date(2021, 12, 31), 0.02)];
        let cells_2022 = [(date(2022, 1, 31), 0.03)];
        let all: Vec<(NaiveDate, f64)> =
            cells_2021.iter().chain(&cells_2022).copied().collect();
        let table = table_from(&[("Sweden", &all)]);

        let table = SmoothingEngine::new(table, Some(config("Y", ""))).smooth();
        let labels: Vec<&str> = table
            .smoothed_columns()
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, ["smoothed_2021", "smoothed_2022"]);
    }

    #[test]
    fn test_zero_sum_bucket_is_undefined() {
        // The two Q1 returns cancel exactly, so the quarter's summed return
        // is zero and its multi-period adjustment undefined.
        let cells = [
            (date(2021, 1, 31), 0.02),
            (date(2021, 2, 28), -0.02),
            (date(2021, 4, 30), 0.01),
        ];
        let table = table_from(&[("Italy", &cells)]);
        let table = SmoothingEngine::new(table, Some(config("Q", ""))).smooth();

        assert_eq!(table.smoothed_columns()[0].values[0], None);
        assert!(table.smoothed_columns()[1].values[0].is_some());
    }

    #[test]
    fn test_zero_compounded_inception_is_undefined() {
        // +25% then -20% compounds to exactly zero over the span.
        let cells = [(date(2021, 1, 31), 0.25), (date(2021, 2, 28), -0.20)];
        let table = table_from(&[("Spain", &cells)]);
        let table = SmoothingEngine::new(table, Some(config("I", ""))).smooth();
        assert_eq!(table.smoothed_columns()[0].values[0], None);
    }

    #[test]
    fn test_zero_return_cell_is_missing_and_bucket_skips_it() {
        let periods = month_ends_2021();
        let records = vec![
            ReturnRecord {
                factor: "Denmark".to_string(),
                period: periods[0],
                value: Some(0.0),
            },
            ReturnRecord {
                factor: "Denmark".to_string(),
                period: periods[1],
                value: Some(0.02),
            },
        ];
        let table = ReturnsTable::from_records(&records);
        assert_eq!(table.row(0)[0], None);

        let table = SmoothingEngine::new(table, Some(config("Q", ""))).smooth();
        // The bucket still produces a value from the remaining period.
        let multi = 1.02_f64.ln() / 0.02;
        assert_relative_eq!(
            table.smoothed_columns()[0].values[0].unwrap(),
            1.02_f64.ln() / multi,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_all_factor_selections_filter_consistently() {
        for factor in FactorSelection::ALL {
            let table = SmoothingEngine::new(
                two_factor_table(),
                Some(EngineConfig {
                    period_selection: PeriodSelection::InceptionToDate,
                    factor_selection: factor,
                }),
            )
            .smooth();
            match factor.name() {
                None => assert_eq!(table.n_rows(), 2),
                Some(name) => assert!(table.n_rows() <= 1 && table.factors().iter().all(|f| f == name)),
            }
        }
    }
}
