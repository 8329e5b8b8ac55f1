//! Carino adjustment arithmetic on optional return values.
//!
//! `None` models the undefined/missing state explicitly. Every function
//! here propagates it silently: a zero return, a missing cell, or a
//! non-positive `1 + r` yields `None`, never an error. The true limit of
//! `ln(1 + r) / r` as r approaches 0 is 1, but the zero case is deliberately
//! left undefined to match the behavior of the original attribution sheet.

/// `ln(1 + r) / r`, the logarithmic adjustment shared by the single-period
/// and multi-period steps. Undefined at `r = 0` and wherever `1 + r <= 0`.
pub(crate) fn log_adjustment(r: f64) -> Option<f64> {
    if r == 0.0 {
        return None;
    }
    let log_growth = (1.0 + r).ln();
    log_growth.is_finite().then(|| log_growth / r)
}

/// Single-period adjustment of one cell.
pub(crate) fn single_period_adjustment(cell: Option<f64>) -> Option<f64> {
    cell.and_then(log_adjustment)
}

/// Compounded multi-period return: the product of `(1 + r)` over the
/// defined values, minus 1. Undefined when no value is defined.
pub(crate) fn compound_return(cells: &[Option<f64>]) -> Option<f64> {
    let mut growth = 1.0;
    let mut any = false;
    for r in cells.iter().flatten() {
        growth *= 1.0 + r;
        any = true;
    }
    any.then(|| growth - 1.0)
}

/// Sum of the defined values. Undefined when no value is defined.
pub(crate) fn sum_returns(cells: &[Option<f64>]) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for r in cells.iter().flatten() {
        total += r;
        any = true;
    }
    any.then_some(total)
}

/// Smoothed contribution of one bucket of a row: the sum of the defined
/// per-period contributions `single_adjustment * r / multi_adjustment`.
///
/// `bucket_return` is the bucket's multi-period return (compounded or
/// summed, per the caller's aggregation policy). Undefined when the bucket's
/// multi-period adjustment is undefined, and when no contribution inside
/// the bucket is defined.
pub(crate) fn smoothed_bucket(cells: &[Option<f64>], bucket_return: Option<f64>) -> Option<f64> {
    let multi_adjustment = bucket_return.and_then(log_adjustment)?;
    let mut total = 0.0;
    let mut any = false;
    for cell in cells {
        if let (Some(r), Some(adjustment)) = (*cell, single_period_adjustment(*cell)) {
            total += adjustment * r / multi_adjustment;
            any = true;
        }
    }
    any.then_some(total)
}
