//! Monthly KPI aggregation.

use crate::types::{MonthlyKpi, Transaction, YearMonth};
use std::collections::HashMap;

/// Aggregate the cleaned transaction set into one KPI row per calendar month,
/// ordered ascending by month. Months absent from the data are simply absent
/// from the table; contiguity is not assumed.
pub fn monthly_kpis(transactions: &[Transaction]) -> Vec<MonthlyKpi> {
    let mut sums: HashMap<YearMonth, (f64, f64)> = HashMap::new();
    for t in transactions {
        let e = sums.entry(t.year_month).or_insert((0.0, 0.0));
        e.0 += t.sales;
        e.1 += t.profit;
    }

    // Map order is arbitrary; the growth column below depends on
    // chronological rows, so sort before deriving anything.
    let mut months: Vec<(YearMonth, (f64, f64))> = sums.into_iter().collect();
    months.sort_by_key(|(ym, _)| *ym);

    let mut kpis = Vec::with_capacity(months.len());
    let mut prev_sales: Option<f64> = None;
    for (year_month, (sales, profit)) in months {
        let profit_margin_pct = if sales == 0.0 {
            None
        } else {
            Some(profit / sales * 100.0)
        };
        let sales_growth_pct = prev_sales.map(|prev| (sales - prev) / prev * 100.0);
        kpis.push(MonthlyKpi {
            year_month,
            sales,
            profit,
            profit_margin_pct,
            sales_growth_pct,
        });
        prev_sales = Some(sales);
    }
    kpis
}
