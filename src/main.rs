// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the transactions CSV, printing row accounting.
// - Option [2] runs the analysis chain: monthly KPI table, drop detection,
//   root cause attribution for the first flagged month, impact estimate and
//   recommendations. Report CSVs and a JSON summary are written alongside
//   the console previews.
// - After an analysis pass, the user can go back to the menu or exit.

use clap::Parser;
use kpi_monitor::pipeline::{self, AnalysisOptions};
use kpi_monitor::types::{BreakdownRow, DeltaRow, DropRow, Impact, KpiRow, RunSummary, Transaction};
use kpi_monitor::{cleaning, drops, output, util};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser, Debug)]
#[command(
    name = "kpi-monitor",
    about = "Monthly sales KPI monitoring over a retail order export"
)]
struct Args {
    /// Path to the delimited transactions export.
    #[arg(short, long, default_value = "data/train.csv")]
    input: PathBuf,

    /// Sales growth percentage below which a month is flagged.
    #[arg(
        short,
        long,
        default_value_t = drops::DEFAULT_DROP_THRESHOLD,
        allow_negative_numbers = true
    )]
    threshold: f64,

    /// Directory for the generated report files.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

// Simple in-memory app state so we only load/clean the CSV once but can
// run the analysis multiple times in a single session.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<Transaction>>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after an analysis pass.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and clean the CSV file.
///
/// On success, we store the cleaned transactions in `APP_STATE` and print
/// a short textual summary of what happened.
fn handle_load(args: &Args) {
    match cleaning::load_and_clean(&args.input) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} kept after cleaning)",
                util::format_int(report.total_rows as i64),
                util::format_int(report.kept_rows as i64)
            );
            println!(
                "Note: {} rows dropped for parse errors, {} for negative shipping durations, {} as sales outliers.",
                util::format_int(report.parse_drops as i64),
                util::format_int(report.negative_shipping_drops as i64),
                util::format_int(report.outlier_drops as i64)
            );
            println!();
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load {}: {}\n", args.input.display(), e);
        }
    }
}

/// Handle option [2]: run the full analysis and render every stage.
fn handle_analyze(args: &Args) {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let report = pipeline::run_analysis(
        &data,
        &AnalysisOptions {
            drop_threshold: args.threshold,
        },
    );

    let kpi_rows: Vec<KpiRow> = report.kpis.iter().map(KpiRow::from).collect();
    let kpi_file = args.out_dir.join("monthly_kpis.csv");
    if let Err(e) = output::write_csv(&kpi_file, &kpi_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Monthly KPIs\n");
    output::preview_table(&kpi_rows, 6);
    println!("(Full table exported to {})\n", kpi_file.display());

    if report.drops.is_empty() {
        println!("No significant KPI drop detected.\n");
    } else {
        let drop_rows: Vec<DropRow> = report.drops.iter().map(DropRow::from).collect();
        let drops_file = args.out_dir.join("kpi_drops.csv");
        if let Err(e) = output::write_csv(&drops_file, &drop_rows) {
            eprintln!("Write error: {}", e);
        }
        println!("KPI drops detected (growth below {}%)\n", args.threshold);
        output::preview_table(&drop_rows, 12);
        println!("(Full table exported to {})\n", drops_file.display());
    }

    if let Some(rc) = &report.root_cause {
        println!("Root cause analysis for {} (vs {})\n", rc.month, rc.prior);

        println!("Region impact:");
        let rows: Vec<DeltaRow> = rc.region_changes.iter().map(DeltaRow::from).collect();
        output::preview_table(&rows, 10);

        println!("Category impact:");
        let rows: Vec<DeltaRow> = rc.category_changes.iter().map(DeltaRow::from).collect();
        output::preview_table(&rows, 10);

        println!("Segment impact:");
        let rows: Vec<DeltaRow> = rc.segment_changes.iter().map(DeltaRow::from).collect();
        output::preview_table(&rows, 10);

        println!("Region totals for {}:", rc.month);
        let rows: Vec<BreakdownRow> = rc.region_totals.iter().map(BreakdownRow::from).collect();
        output::preview_table(&rows, 10);

        println!("Category totals for {}:", rc.month);
        let rows: Vec<BreakdownRow> = rc.category_totals.iter().map(BreakdownRow::from).collect();
        output::preview_table(&rows, 10);

        if let Some(delta) = rc.sales_delta {
            println!(
                "Estimated revenue change vs {}: {}\n",
                rc.prior,
                util::format_number(delta, 2)
            );
        }
        for advice in &rc.targeted_advice {
            println!("- {}", advice);
        }
        if !rc.targeted_advice.is_empty() {
            println!();
        }
    }

    println!("Business impact:");
    match report.impact {
        Impact::InsufficientData => println!("Not enough data to calculate impact.\n"),
        Impact::Values {
            average_sales_loss,
            average_profit_loss,
        } => println!(
            "Average sales loss: {} | Average profit loss: {}\n",
            util::format_number(average_sales_loss, 2),
            util::format_number(average_profit_loss, 2)
        ),
    }

    println!("Recommendations:");
    for advisory in &report.advisories {
        println!("- {}", advisory);
    }
    println!();

    let summary = RunSummary {
        months: report.kpis.len(),
        flagged_months: report.drops.len(),
        impact: report.impact,
        recommendations: report.advisories.iter().map(|a| a.to_string()).collect(),
    };
    let summary_file = args.out_dir.join("summary.json");
    if let Err(e) = output::write_json(&summary_file, &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("(Run summary exported to {})\n", summary_file.display());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    loop {
        println!("KPI drop analysis");
        println!("[1] Load and clean the dataset");
        println!("[2] Run KPI analysis\n");
        match read_choice().as_str() {
            "1" => {
                handle_load(&args);
            }
            "2" => {
                println!();
                handle_analyze(&args);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
