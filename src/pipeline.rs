//! Full-chain analysis driver.
//!
//! Runs the stages in their dependency order: monthly KPIs, drop detection,
//! root cause attribution for the first flagged month (when any), then the
//! impact estimate and recommendations. Impact always runs, drop or no drop.

use crate::types::{
    Advisory, Dimension, DimensionDelta, DimensionTotals, DropRecord, Impact, MonthlyKpi,
    Transaction, YearMonth,
};
use crate::{drops, impact, kpi, recommend, root_cause};

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Sales growth percentage below which a month is flagged.
    pub drop_threshold: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            drop_threshold: drops::DEFAULT_DROP_THRESHOLD,
        }
    }
}

/// Attribution detail for the first flagged month.
#[derive(Debug, Clone)]
pub struct RootCauseReport {
    pub month: YearMonth,
    pub prior: YearMonth,
    pub region_totals: Vec<DimensionTotals>,
    pub category_totals: Vec<DimensionTotals>,
    pub segment_totals: Vec<DimensionTotals>,
    pub region_changes: Vec<DimensionDelta>,
    pub category_changes: Vec<DimensionDelta>,
    pub segment_changes: Vec<DimensionDelta>,
    /// Sales change of the flagged month versus the month before it, when
    /// both months exist in the KPI table.
    pub sales_delta: Option<f64>,
    pub targeted_advice: Vec<String>,
}

/// Everything the presentation layer needs from one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub kpis: Vec<MonthlyKpi>,
    pub drops: Vec<DropRecord>,
    pub root_cause: Option<RootCauseReport>,
    pub impact: Impact,
    pub advisories: Vec<Advisory>,
}

pub fn run_analysis(transactions: &[Transaction], options: &AnalysisOptions) -> AnalysisReport {
    let kpis = kpi::monthly_kpis(transactions);
    tracing::info!(months = kpis.len(), "monthly KPIs computed");

    let drops = drops::detect_drops(&kpis, options.drop_threshold);
    tracing::info!(
        flagged = drops.len(),
        threshold = options.drop_threshold,
        "drop scan complete"
    );

    let root_cause = drops.first().map(|drop| {
        let month = drop.year_month;
        let prior = month.pred();
        let region_changes =
            root_cause::month_over_month(transactions, Dimension::Region, month, prior);
        let category_changes =
            root_cause::month_over_month(transactions, Dimension::Category, month, prior);
        let segment_changes =
            root_cause::month_over_month(transactions, Dimension::Segment, month, prior);
        let targeted_advice =
            recommend::targeted(&region_changes, &category_changes, &segment_changes);
        tracing::info!(%month, "root cause attribution complete");
        RootCauseReport {
            month,
            prior,
            region_totals: root_cause::breakdown(transactions, Dimension::Region, month),
            category_totals: root_cause::breakdown(transactions, Dimension::Category, month),
            segment_totals: root_cause::breakdown(transactions, Dimension::Segment, month),
            region_changes,
            category_changes,
            segment_changes,
            sales_delta: impact::month_sales_delta(&kpis, month),
            targeted_advice,
        }
    });

    let impact = impact::calculate_impact(&kpis);
    let advisories = recommend::generate(&impact);

    AnalysisReport {
        kpis,
        drops,
        root_cause,
        impact,
        advisories,
    }
}
