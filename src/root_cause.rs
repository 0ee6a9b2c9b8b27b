//! Root cause attribution for a flagged month.
//!
//! Two views over the same transaction slice: absolute per-value totals for
//! one month, and the signed change between a month and the one before it.
//! Both are parameterized by [`Dimension`] and sort worst contributors first.

use crate::types::{Dimension, DimensionDelta, DimensionTotals, Transaction, YearMonth};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

fn month_sums<'a>(
    transactions: &'a [Transaction],
    dimension: Dimension,
    month: YearMonth,
) -> HashMap<&'a str, (f64, f64)> {
    let mut sums: HashMap<&str, (f64, f64)> = HashMap::new();
    for t in transactions.iter().filter(|t| t.year_month == month) {
        let e = sums.entry(dimension.value_of(t)).or_insert((0.0, 0.0));
        e.0 += t.sales;
        e.1 += t.profit;
    }
    sums
}

/// Absolute sales/profit totals per dimension value for `month`, ascending by
/// total sales so the weakest contributor comes first. Empty when the month
/// has no transactions.
pub fn breakdown(
    transactions: &[Transaction],
    dimension: Dimension,
    month: YearMonth,
) -> Vec<DimensionTotals> {
    let mut rows: Vec<DimensionTotals> = month_sums(transactions, dimension, month)
        .into_iter()
        .map(|(value, (total_sales, total_profit))| DimensionTotals {
            value: value.to_string(),
            total_sales,
            total_profit,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.total_sales
            .partial_cmp(&b.total_sales)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Signed change of per-value sums between `month` and `prior`, ascending by
/// sales change so the most negative contributor comes first. A value absent
/// from one side contributes zero on that side.
pub fn month_over_month(
    transactions: &[Transaction],
    dimension: Dimension,
    month: YearMonth,
    prior: YearMonth,
) -> Vec<DimensionDelta> {
    let current = month_sums(transactions, dimension, month);
    let previous = month_sums(transactions, dimension, prior);

    let mut values: BTreeSet<&str> = current.keys().copied().collect();
    values.extend(previous.keys().copied());

    let mut rows: Vec<DimensionDelta> = values
        .into_iter()
        .map(|value| {
            let (cur_sales, cur_profit) = current.get(value).copied().unwrap_or((0.0, 0.0));
            let (prev_sales, prev_profit) = previous.get(value).copied().unwrap_or((0.0, 0.0));
            DimensionDelta {
                value: value.to_string(),
                sales_change: cur_sales - prev_sales,
                profit_change: cur_profit - prev_profit,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.sales_change
            .partial_cmp(&b.sales_change)
            .unwrap_or(Ordering::Equal)
    });
    rows
}
