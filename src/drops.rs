//! Drop detection over the monthly KPI table.

use crate::types::{DropRecord, MonthlyKpi};

/// Default flagging threshold: a month-over-month sales decline of more than
/// ten percent.
pub const DEFAULT_DROP_THRESHOLD: f64 = -10.0;

/// Scan the KPI table in order and flag every month whose sales growth is
/// strictly below `threshold`. Months with undefined growth (the first month
/// on record) are skipped, never flagged.
pub fn detect_drops(kpis: &[MonthlyKpi], threshold: f64) -> Vec<DropRecord> {
    kpis.iter()
        .filter_map(|row| match row.sales_growth_pct {
            Some(growth) if growth < threshold => Some(DropRecord {
                year_month: row.year_month,
                kpi: "sales",
                drop_pct: growth,
            }),
            _ => None,
        })
        .collect()
}
