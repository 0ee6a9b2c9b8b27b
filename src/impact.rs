//! Impact estimation from trailing KPI windows.

use crate::types::{Impact, MonthlyKpi, YearMonth};
use crate::util::{average, round2};

/// Compare the mean of the last two KPI months against the mean of the two
/// months before those. Positive values mean decline. With fewer than four
/// months on record there is no meaningful comparison and the sentinel is
/// returned instead.
pub fn calculate_impact(kpis: &[MonthlyKpi]) -> Impact {
    if kpis.len() < 4 {
        return Impact::InsufficientData;
    }
    let n = kpis.len();
    let recent = &kpis[n - 2..];
    let previous = &kpis[n - 4..n - 2];

    let mean_sales = |rows: &[MonthlyKpi]| average(&rows.iter().map(|k| k.sales).collect::<Vec<_>>());
    let mean_profit =
        |rows: &[MonthlyKpi]| average(&rows.iter().map(|k| k.profit).collect::<Vec<_>>());

    Impact::Values {
        average_sales_loss: round2(mean_sales(previous) - mean_sales(recent)),
        average_profit_loss: round2(mean_profit(previous) - mean_profit(recent)),
    }
}

/// Sales change of `month` versus the calendar month before it, when both
/// appear in the KPI table.
pub fn month_sales_delta(kpis: &[MonthlyKpi], month: YearMonth) -> Option<f64> {
    let current = kpis.iter().find(|k| k.year_month == month)?;
    let prior = kpis.iter().find(|k| k.year_month == month.pred())?;
    Some(round2(current.sales - prior.sales))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(month: u32, sales: f64, profit: f64) -> MonthlyKpi {
        MonthlyKpi {
            year_month: YearMonth::new(2017, month),
            sales,
            profit,
            profit_margin_pct: Some(profit / sales * 100.0),
            sales_growth_pct: None,
        }
    }

    #[test]
    fn short_history_returns_the_sentinel() {
        assert_eq!(calculate_impact(&[]), Impact::InsufficientData);
        let two = vec![kpi(1, 1000.0, 100.0), kpi(2, 900.0, 90.0)];
        assert_eq!(calculate_impact(&two), Impact::InsufficientData);
        let three = vec![
            kpi(1, 1000.0, 100.0),
            kpi(2, 900.0, 90.0),
            kpi(3, 800.0, 80.0),
        ];
        assert_eq!(calculate_impact(&three), Impact::InsufficientData);
    }

    #[test]
    fn decline_yields_positive_losses() {
        let kpis = vec![
            kpi(1, 1200.0, 120.0),
            kpi(2, 1000.0, 100.0),
            kpi(3, 900.0, 85.0),
            kpi(4, 800.0, 75.0),
        ];
        // previous mean sales 1100, recent 850; profit 110 vs 80.
        match calculate_impact(&kpis) {
            Impact::Values {
                average_sales_loss,
                average_profit_loss,
            } => {
                assert_eq!(average_sales_loss, 250.0);
                assert_eq!(average_profit_loss, 30.0);
            }
            Impact::InsufficientData => panic!("expected values"),
        }
    }

    #[test]
    fn improvement_yields_negative_losses() {
        let kpis = vec![
            kpi(1, 800.0, 75.0),
            kpi(2, 900.0, 85.0),
            kpi(3, 1000.0, 100.0),
            kpi(4, 1200.0, 120.0),
        ];
        match calculate_impact(&kpis) {
            Impact::Values {
                average_sales_loss,
                average_profit_loss,
            } => {
                assert!(average_sales_loss < 0.0);
                assert!(average_profit_loss < 0.0);
            }
            Impact::InsufficientData => panic!("expected values"),
        }
    }

    #[test]
    fn only_the_trailing_four_months_matter() {
        let kpis = vec![
            kpi(1, 99999.0, 9999.0), // outside the window
            kpi(2, 1200.0, 120.0),
            kpi(3, 1000.0, 100.0),
            kpi(4, 900.0, 85.0),
            kpi(5, 800.0, 75.0),
        ];
        match calculate_impact(&kpis) {
            Impact::Values {
                average_sales_loss, ..
            } => assert_eq!(average_sales_loss, 250.0),
            Impact::InsufficientData => panic!("expected values"),
        }
    }

    #[test]
    fn month_delta_needs_both_months() {
        let kpis = vec![kpi(3, 1200.0, 120.0), kpi(4, 1020.0, 100.0)];
        assert_eq!(
            month_sales_delta(&kpis, YearMonth::new(2017, 4)),
            Some(-180.0)
        );
        assert_eq!(month_sales_delta(&kpis, YearMonth::new(2017, 3)), None);
        assert_eq!(month_sales_delta(&kpis, YearMonth::new(2017, 6)), None);
    }
}
