//! Data cleaning stage.
//!
//! Loads a delimited order export and turns it into the typed, time-sorted
//! transaction set every other stage aggregates over. Row-level defects are
//! excluded and counted, never raised; only an unreadable source or a missing
//! required column aborts the run.

use crate::error::{PipelineError, Result};
use crate::types::{Transaction, YearMonth};
use crate::util::{parse_date_safe, parse_f64_safe, percentile};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Row accounting from one cleaning pass, for console diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_drops: usize,
    pub negative_shipping_drops: usize,
    pub outlier_drops: usize,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Positions of the required columns after header normalization.
struct ColumnIndex {
    order_date: usize,
    ship_date: usize,
    sales: usize,
    profit: usize,
    postal_code: usize,
    region: usize,
    category: usize,
    segment: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        // First occurrence wins, so duplicated column names collapse to one.
        let mut by_name: HashMap<String, usize> = HashMap::new();
        for (idx, raw) in headers.iter().enumerate() {
            by_name.entry(normalize_header(raw)).or_insert(idx);
        }
        let lookup = |name: &'static str| {
            by_name
                .get(name)
                .copied()
                .ok_or(PipelineError::MissingColumn(name))
        };
        Ok(ColumnIndex {
            order_date: lookup("order_date")?,
            ship_date: lookup("ship_date")?,
            sales: lookup("sales")?,
            profit: lookup("profit")?,
            postal_code: lookup("postal_code")?,
            region: lookup("region")?,
            category: lookup("category")?,
            segment: lookup("segment")?,
        })
    }
}

/// Load and clean the transactions export at `path`.
pub fn load_and_clean(path: &Path) -> Result<(Vec<Transaction>, CleanReport)> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    clean_with_reader(rdr)
}

/// Same pipeline over any reader, used by tests with in-memory CSV text.
pub fn clean_from_reader<R: Read>(reader: R) -> Result<(Vec<Transaction>, CleanReport)> {
    let rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    clean_with_reader(rdr)
}

fn clean_with_reader<R: Read>(mut rdr: Reader<R>) -> Result<(Vec<Transaction>, CleanReport)> {
    let columns = ColumnIndex::from_headers(rdr.headers()?)?;
    let mut report = CleanReport::default();
    let mut prelim: Vec<Transaction> = Vec::new();

    for result in rdr.records() {
        report.total_rows += 1;
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                report.parse_drops += 1;
                continue;
            }
        };

        // A row missing any of the four core fields is excluded, not fatal.
        let order_date = match parse_date_safe(record.get(columns.order_date)) {
            Some(d) => d,
            None => {
                report.parse_drops += 1;
                continue;
            }
        };
        let ship_date = match parse_date_safe(record.get(columns.ship_date)) {
            Some(d) => d,
            None => {
                report.parse_drops += 1;
                continue;
            }
        };
        let sales = match parse_f64_safe(record.get(columns.sales)) {
            Some(v) => v,
            None => {
                report.parse_drops += 1;
                continue;
            }
        };
        let profit = match parse_f64_safe(record.get(columns.profit)) {
            Some(v) => v,
            None => {
                report.parse_drops += 1;
                continue;
            }
        };

        let shipping_days = (ship_date - order_date).num_days();
        if shipping_days < 0 {
            report.negative_shipping_drops += 1;
            continue;
        }

        let categorical = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown")
                .to_string()
        };

        prelim.push(Transaction {
            region: categorical(columns.region),
            category: categorical(columns.category),
            segment: categorical(columns.segment),
            // Kept as text so codes like `01742` survive round-trips.
            postal_code: record
                .get(columns.postal_code)
                .map(str::trim)
                .unwrap_or("")
                .to_string(),
            order_date,
            ship_date,
            sales,
            profit,
            year_month: YearMonth::from_date(order_date),
            shipping_days,
        });
    }

    // Exclude extreme high outliers: anything above the 99th percentile of
    // the post-filter sales column.
    if let Some(cap) = percentile(prelim.iter().map(|t| t.sales).collect(), 0.99) {
        let before = prelim.len();
        prelim.retain(|t| t.sales <= cap);
        report.outlier_drops = before - prelim.len();
    }

    // Stable sort, so same-day rows keep their arrival order.
    prelim.sort_by(|a, b| a.order_date.cmp(&b.order_date));
    report.kept_rows = prelim.len();

    tracing::debug!(
        total = report.total_rows,
        kept = report.kept_rows,
        parse = report.parse_drops,
        shipping = report.negative_shipping_drops,
        outliers = report.outlier_drops,
        "cleaning pass finished"
    );

    Ok((prelim, report))
}

/// Time-ordered prefix/suffix split of an already-sorted transaction set,
/// for out-of-sample KPI comparison (e.g. 70% train / 30% test).
pub fn time_split(transactions: &[Transaction], train_fraction: f64) -> (&[Transaction], &[Transaction]) {
    let split = (transactions.len() as f64 * train_fraction.clamp(0.0, 1.0)) as usize;
    transactions.split_at(split.min(transactions.len()))
}
