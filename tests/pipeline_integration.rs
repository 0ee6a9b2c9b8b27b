use chrono::NaiveDate;
use kpi_monitor::cleaning;
use kpi_monitor::pipeline::{run_analysis, AnalysisOptions};
use kpi_monitor::types::{Advisory, Dimension, Impact, Transaction, YearMonth};
use kpi_monitor::{impact, root_cause};

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn tx(
    month: u32,
    day: u32,
    region: &str,
    category: &str,
    segment: &str,
    sales: f64,
) -> Transaction {
    let order_date = NaiveDate::from_ymd_opt(2017, month, day).unwrap();
    Transaction {
        region: region.into(),
        category: category.into(),
        segment: segment.into(),
        postal_code: "10001".into(),
        order_date,
        ship_date: order_date + chrono::Duration::days(3),
        sales,
        profit: sales * 0.1,
        year_month: YearMonth::from_date(order_date),
        shipping_days: 3,
    }
}

/// Six months of data. Month 4 drops 15% versus month 3 (1200 -> 1020),
/// driven by the East region; every other month grows.
fn six_month_drop_dataset() -> Vec<Transaction> {
    let east = |month, sales| tx(month, 5, "East", "Furniture", "Consumer", sales);
    let west = |month, sales| tx(month, 20, "West", "Technology", "Corporate", sales);
    vec![
        east(1, 600.0),
        west(1, 400.0),
        east(2, 600.0),
        west(2, 500.0),
        east(3, 600.0),
        west(3, 600.0),
        east(4, 420.0),
        west(4, 600.0),
        east(5, 520.0),
        west(5, 520.0),
        east(6, 530.0),
        west(6, 530.0),
    ]
}

fn csv_of(transactions: &[Transaction]) -> String {
    let mut text =
        String::from("Order Date,Ship Date,Sales,Profit,Postal Code,Region,Category,Segment\n");
    for t in transactions {
        text.push_str(&format!(
            "{},{},{:.2},{:.2},{},{},{},{}\n",
            t.order_date, t.ship_date, t.sales, t.profit, t.postal_code, t.region, t.category,
            t.segment
        ));
    }
    text
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn happy_path_flags_month_four_and_attributes_it() {
    let data = six_month_drop_dataset();
    let report = run_analysis(&data, &AnalysisOptions::default());

    assert_eq!(report.kpis.len(), 6);
    assert!(report
        .kpis
        .windows(2)
        .all(|w| w[0].year_month < w[1].year_month));

    // Exactly one drop, in month 4, at -15%.
    assert_eq!(report.drops.len(), 1);
    let drop = &report.drops[0];
    assert_eq!(drop.year_month, YearMonth::new(2017, 4));
    assert_eq!(drop.kpi, "sales");
    assert!((drop.drop_pct - (-15.0)).abs() < 1e-9);

    // Root cause for the flagged month: non-empty, ascending by sales.
    let rc = report.root_cause.as_ref().expect("root cause expected");
    assert_eq!(rc.month, YearMonth::new(2017, 4));
    assert_eq!(rc.prior, YearMonth::new(2017, 3));
    assert!(!rc.region_totals.is_empty());
    assert!(rc
        .region_totals
        .windows(2)
        .all(|w| w[0].total_sales <= w[1].total_sales));
    assert_eq!(rc.region_totals[0].value, "East");

    // The delta view pins the decline on East: 420 - 600.
    assert_eq!(rc.region_changes[0].value, "East");
    assert!((rc.region_changes[0].sales_change - (-180.0)).abs() < 1e-9);
    assert_eq!(rc.sales_delta, Some(-180.0));
    assert!(rc.targeted_advice.iter().any(|a| a.contains("East")));
    assert!(rc.targeted_advice.iter().any(|a| a.contains("Furniture")));
    assert!(rc.targeted_advice.iter().any(|a| a.contains("Consumer")));

    // Impact: previous window (m3, m4) mean 1110 vs recent (m5, m6) mean 1050.
    assert_eq!(
        report.impact,
        Impact::Values {
            average_sales_loss: 60.0,
            average_profit_loss: 6.0,
        }
    );
    assert_eq!(
        report.advisories,
        vec![Advisory::SalesDecline, Advisory::MarginErosion]
    );
}

#[test]
fn csv_end_to_end_matches_the_typed_fixture() {
    let text = csv_of(&six_month_drop_dataset());
    let (data, report) = cleaning::clean_from_reader(text.as_bytes()).unwrap();
    assert_eq!(report.kept_rows, 12);
    assert_eq!(report.outlier_drops, 0);

    let analysis = run_analysis(&data, &AnalysisOptions::default());
    assert_eq!(analysis.drops.len(), 1);
    assert_eq!(analysis.drops[0].year_month, YearMonth::new(2017, 4));
    assert_eq!(
        analysis.impact,
        Impact::Values {
            average_sales_loss: 60.0,
            average_profit_loss: 6.0,
        }
    );
}

#[test]
fn healthy_history_reports_no_drops_and_stable_kpis() {
    let data = vec![
        tx(1, 5, "East", "Furniture", "Consumer", 1000.0),
        tx(2, 5, "East", "Furniture", "Consumer", 1010.0),
        tx(3, 5, "East", "Furniture", "Consumer", 1020.0),
        tx(4, 5, "East", "Furniture", "Consumer", 1030.0),
    ];
    let report = run_analysis(&data, &AnalysisOptions::default());

    assert!(report.drops.is_empty());
    assert!(report.root_cause.is_none());

    // Impact still runs and shows improvement (negative losses).
    match report.impact {
        Impact::Values {
            average_sales_loss,
            average_profit_loss,
        } => {
            assert!(average_sales_loss < 0.0);
            assert!(average_profit_loss < 0.0);
        }
        Impact::InsufficientData => panic!("four months should be enough"),
    }
    assert_eq!(report.advisories, vec![Advisory::Stable]);
}

#[test]
fn two_months_of_history_yield_the_insufficient_data_advisory() {
    let data = vec![
        tx(1, 5, "East", "Furniture", "Consumer", 1000.0),
        tx(2, 5, "East", "Furniture", "Consumer", 900.0),
    ];
    let report = run_analysis(&data, &AnalysisOptions::default());

    assert_eq!(report.impact, Impact::InsufficientData);
    assert_eq!(report.advisories, vec![Advisory::InsufficientData]);
}

#[test]
fn zero_sales_month_does_not_break_the_pipeline() {
    let data = vec![
        tx(1, 5, "East", "Furniture", "Consumer", 100.0),
        tx(2, 5, "East", "Furniture", "Consumer", 40.0),
        tx(2, 20, "West", "Technology", "Corporate", -40.0),
    ];
    let report = run_analysis(&data, &AnalysisOptions::default());

    let feb = report
        .kpis
        .iter()
        .find(|k| k.year_month == YearMonth::new(2017, 2))
        .unwrap();
    assert_eq!(feb.sales, 0.0);
    assert_eq!(feb.profit_margin_pct, None);

    // A collapse to zero is a full -100% drop and is flagged.
    assert_eq!(report.drops.len(), 1);
    assert!(report.root_cause.is_some());
}

#[test]
fn breakdowns_of_a_month_without_transactions_are_empty() {
    let data = six_month_drop_dataset();
    let missing = YearMonth::new(2018, 1);
    assert!(root_cause::breakdown(&data, Dimension::Region, missing).is_empty());
    assert!(root_cause::month_over_month(&data, Dimension::Region, missing, missing.pred())
        .is_empty());

    let kpis = kpi_monitor::kpi::monthly_kpis(&data);
    assert_eq!(impact::month_sales_delta(&kpis, missing), None);
}
