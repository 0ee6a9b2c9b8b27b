//! Qualitative recommendations from the impact estimate.

use crate::types::{Advisory, DimensionDelta, Impact};

/// Map the impact estimate to an ordered set of fixed advisories: a sales
/// advisory when sales declined, a margin advisory when profit declined, and
/// a single "stable" advisory when neither did.
pub fn generate(impact: &Impact) -> Vec<Advisory> {
    match *impact {
        Impact::InsufficientData => vec![Advisory::InsufficientData],
        Impact::Values {
            average_sales_loss,
            average_profit_loss,
        } => {
            let mut advisories = Vec::new();
            if average_sales_loss > 0.0 {
                advisories.push(Advisory::SalesDecline);
            }
            if average_profit_loss > 0.0 {
                advisories.push(Advisory::MarginErosion);
            }
            if advisories.is_empty() {
                advisories.push(Advisory::Stable);
            }
            advisories
        }
    }
}

/// Name the worst negative contributor per dimension, when there is one.
/// Expects each slice sorted ascending by sales change, as produced by
/// [`crate::root_cause::month_over_month`].
pub fn targeted(
    region: &[DimensionDelta],
    category: &[DimensionDelta],
    segment: &[DimensionDelta],
) -> Vec<String> {
    let worst = |rows: &[DimensionDelta]| {
        rows.first()
            .filter(|d| d.sales_change < 0.0)
            .map(|d| d.value.clone())
    };
    let mut advice = Vec::new();
    if let Some(value) = worst(region) {
        advice.push(format!("Focus recovery strategy in the {value} region."));
    }
    if let Some(value) = worst(category) {
        advice.push(format!(
            "Review pricing and promotion for the {value} category."
        ));
    }
    if let Some(value) = worst(segment) {
        advice.push(format!("Target retention offers at {value} customers."));
    }
    advice
}
