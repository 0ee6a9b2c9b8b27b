use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use tabled::Tabled;

use crate::util::format_number;

/// Calendar month bucket derived from an order date. Ordered and hashable so
/// it can key aggregations; renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The immediately preceding calendar month.
    pub fn pred(&self) -> Self {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One cleaned order line. Held read-only after cleaning; every downstream
/// aggregation works from a shared slice of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub region: String,
    pub category: String,
    pub segment: String,
    /// Opaque identifier, kept as text so leading zeros survive.
    pub postal_code: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub sales: f64,
    pub profit: f64,
    #[serde(skip)]
    pub year_month: YearMonth,
    #[serde(skip)]
    pub shipping_days: i64,
}

/// Monthly KPI row. `profit_margin_pct` is `None` for a zero-sales month and
/// `sales_growth_pct` is `None` for the first month on record; both are
/// expected states, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyKpi {
    pub year_month: YearMonth,
    pub sales: f64,
    pub profit: f64,
    pub profit_margin_pct: Option<f64>,
    pub sales_growth_pct: Option<f64>,
}

/// A month whose sales growth breached the configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropRecord {
    pub year_month: YearMonth,
    pub kpi: &'static str,
    pub drop_pct: f64,
}

/// Categorical dimension the root cause analysis can slice by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Region,
    Category,
    Segment,
}

impl Dimension {
    pub fn value_of<'a>(&self, t: &'a Transaction) -> &'a str {
        match self {
            Dimension::Region => &t.region,
            Dimension::Category => &t.category,
            Dimension::Segment => &t.segment,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Region => write!(f, "region"),
            Dimension::Category => write!(f, "category"),
            Dimension::Segment => write!(f, "segment"),
        }
    }
}

/// Absolute per-value totals for one month and one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionTotals {
    pub value: String,
    pub total_sales: f64,
    pub total_profit: f64,
}

/// Signed month-over-month change for one dimension value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionDelta {
    pub value: String,
    pub sales_change: f64,
    pub profit_change: f64,
}

/// Outcome of the trailing-window impact estimate. The sentinel variant is
/// the expected result for short histories, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Impact {
    InsufficientData,
    Values {
        average_sales_loss: f64,
        average_profit_loss: f64,
    },
}

/// Fixed advisory vocabulary emitted by the recommendation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    InsufficientData,
    SalesDecline,
    MarginErosion,
    Stable,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::InsufficientData => {
                write!(f, "Not enough data to generate recommendations.")
            }
            Advisory::SalesDecline => write!(
                f,
                "Investigate decline in sales. Consider promotions or targeted marketing campaigns."
            ),
            Advisory::MarginErosion => write!(
                f,
                "Profit margins are shrinking. Review discount strategy and supplier costs."
            ),
            Advisory::Stable => write!(f, "KPIs are stable. Continue monitoring performance."),
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation rows
//
// Pre-formatted rows for console previews and CSV exports. The numeric truth
// lives in the types above; these only carry display strings.
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Sales")]
    #[tabled(rename = "Sales")]
    pub sales: String,
    #[serde(rename = "Profit")]
    #[tabled(rename = "Profit")]
    pub profit: String,
    #[serde(rename = "ProfitMarginPct")]
    #[tabled(rename = "ProfitMarginPct")]
    pub profit_margin_pct: String,
    #[serde(rename = "SalesGrowthPct")]
    #[tabled(rename = "SalesGrowthPct")]
    pub sales_growth_pct: String,
}

impl From<&MonthlyKpi> for KpiRow {
    fn from(kpi: &MonthlyKpi) -> Self {
        let opt = |v: Option<f64>| match v {
            Some(n) => format_number(n, 2),
            None => "n/a".to_string(),
        };
        KpiRow {
            month: kpi.year_month.to_string(),
            sales: format_number(kpi.sales, 2),
            profit: format_number(kpi.profit, 2),
            profit_margin_pct: opt(kpi.profit_margin_pct),
            sales_growth_pct: opt(kpi.sales_growth_pct),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DropRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Kpi")]
    #[tabled(rename = "Kpi")]
    pub kpi: String,
    #[serde(rename = "DropPct")]
    #[tabled(rename = "DropPct")]
    pub drop_pct: String,
}

impl From<&DropRecord> for DropRow {
    fn from(drop: &DropRecord) -> Self {
        DropRow {
            month: drop.year_month.to_string(),
            kpi: drop.kpi.to_string(),
            drop_pct: format_number(drop.drop_pct, 2),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BreakdownRow {
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "TotalSales")]
    #[tabled(rename = "TotalSales")]
    pub total_sales: String,
    #[serde(rename = "TotalProfit")]
    #[tabled(rename = "TotalProfit")]
    pub total_profit: String,
}

impl From<&DimensionTotals> for BreakdownRow {
    fn from(totals: &DimensionTotals) -> Self {
        BreakdownRow {
            value: totals.value.clone(),
            total_sales: format_number(totals.total_sales, 2),
            total_profit: format_number(totals.total_profit, 2),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DeltaRow {
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "SalesChange")]
    #[tabled(rename = "SalesChange")]
    pub sales_change: String,
    #[serde(rename = "ProfitChange")]
    #[tabled(rename = "ProfitChange")]
    pub profit_change: String,
}

impl From<&DimensionDelta> for DeltaRow {
    fn from(delta: &DimensionDelta) -> Self {
        DeltaRow {
            value: delta.value.clone(),
            sales_change: format_number(delta.sales_change, 2),
            profit_change: format_number(delta.profit_change, 2),
        }
    }
}

/// Run summary persisted as JSON next to the report CSVs.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub months: usize,
    pub flagged_months: usize,
    pub impact: Impact,
    pub recommendations: Vec<String>,
}
