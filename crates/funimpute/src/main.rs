//! CLI entry point for imputation analysis.

use anyhow::{Context, Result};
use clap::Parser;
use funimpute::{
    AUTHOR, AnalysisConfig, AnalysisReport, ImputationAnalyzer, ImputationMethod,
    ImputationSuggestion, ImputeError, ReportGenerator, VERSION, load_data, load_metadata,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author = "FunImpute Team",
    version,
    about = "Imputation strategy analysis for tabular data",
    long_about = "Profiles a CSV dataset against its column metadata and suggests, for every \
                  column, how missing values should be imputed.\n\n\
                  EXAMPLES:\n  \
                  # Print a table of suggestions\n  \
                  funimpute --metadata metadata.csv --data data.csv\n\n  \
                  # Machine-readable output\n  \
                  funimpute -m metadata.csv -d data.csv --json | jq '.summary'\n\n  \
                  # Save a JSON report and a CSV of suggestions\n  \
                  funimpute -m metadata.csv -d data.csv --report out/report.json --export-csv out/suggestions.csv"
)]
struct Args {
    /// Path to the metadata CSV (one row per column)
    #[arg(short, long)]
    metadata: PathBuf,

    /// Path to the data CSV
    #[arg(short, long)]
    data: PathBuf,

    /// JSON file overriding analysis thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output the JSON report to stdout instead of a table
    ///
    /// Disables all logging so stdout only contains JSON.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to this path
    #[arg(short = 'r', long)]
    report: Option<PathBuf>,

    /// Write one CSV row per suggestion to this path
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Only list columns whose suggested method is this one (e.g. median, knn)
    ///
    /// Affects the printed table; reports and exports keep every column.
    #[arg(long)]
    method: Option<ImputationMethod>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout stays parseable.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if args.json {
                print_json_error(&e);
            } else {
                error!("Analysis failed: {:#}", e);
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AnalysisConfig::from_json_file(path)?
        }
        None => AnalysisConfig::default(),
    };
    let analyzer = ImputationAnalyzer::builder().config(config).build()?;

    // Metadata first, so a missing metadata file wins over a missing data file
    let metadata = load_metadata(&args.metadata)?;
    let data = load_data(&args.data)?;

    let suggestions = analyzer.analyze_dataframe(&data, &metadata)?;
    let report = ReportGenerator::generate(&suggestions, data.height(), data.width());

    if let Some(path) = &args.report {
        ReportGenerator::save_json(&report, path)
            .with_context(|| format!("Writing report to {}", path.display()))?;
    }
    if let Some(path) = &args.export_csv {
        ReportGenerator::export_suggestions_csv(&suggestions, path)
            .with_context(|| format!("Exporting suggestions to {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report, args);
    Ok(())
}

/// Errors from the library keep their code; anything else is reported as-is.
fn print_json_error(err: &anyhow::Error) {
    let body = match err.downcast_ref::<ImputeError>() {
        Some(e) => serde_json::json!({ "error": e }),
        None => serde_json::json!({
            "error": { "code": "CLI_ERROR", "message": format!("{:#}", err) }
        }),
    };
    println!("{}", body);
}

/// Print the suggestion table.
///
/// Uses `println!` for user-facing output; logging goes through `tracing`.
fn print_human_readable_summary(report: &AnalysisReport, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    println!("FunImpute v{} by {}", VERSION, AUTHOR);
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Data:     {} ({} rows x {} columns)",
        args.data.display(),
        report.rows,
        report.columns
    );
    println!("Metadata: {}", args.metadata.display());
    println!();

    println!(
        "{:<20} {:>9} {:<14} {:<16} {:>10} {:<10}",
        "Column", "Missing %", "Mechanism", "Method", "Confidence", "Outliers"
    );
    println!("{}", "-".repeat(80));

    let shown = shown_suggestions(&report.suggestions, args.method);
    for s in &shown {
        println!(
            "{:<20} {:>9.1} {:<14} {:<16} {:>10.3} {:<10}",
            truncate_str(&s.column_name, 19),
            s.missing_percentage,
            s.mechanism.label(),
            s.proposed_method.label(),
            s.confidence_score,
            s.outlier_handling.as_str()
        );
    }
    println!();

    let needing: Vec<_> = shown.iter().filter(|s| s.needs_imputation()).collect();
    if needing.is_empty() {
        println!("No missing values found; no imputation needed.");
    } else {
        println!("Rationale:");
        for s in needing {
            println!("  - {}: {}", s.column_name, s.rationale);
        }
    }
    println!();

    let summary = &report.summary;
    println!("Summary:");
    println!(
        "  Columns with missing values: {} of {}",
        summary.columns_with_missing, summary.columns_analyzed
    );
    println!("  Missing cells: {}", summary.total_missing_values);
    println!("  Average confidence: {:.3}", summary.average_confidence);

    if let Some(path) = &args.report {
        println!("  Report: {}", path.display());
    }
    if let Some(path) = &args.export_csv {
        println!("  Suggestions CSV: {}", path.display());
    }
    println!("{}", "=".repeat(80));
}

/// Suggestions to print, optionally restricted to one method.
fn shown_suggestions(
    suggestions: &[ImputationSuggestion],
    method: Option<ImputationMethod>,
) -> Vec<&ImputationSuggestion> {
    suggestions
        .iter()
        .filter(|s| method.is_none_or(|m| s.proposed_method == m))
        .collect()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> std::result::Result<Args, clap::Error> {
        let mut argv = vec!["funimpute", "-m", "meta.csv", "-d", "data.csv"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn test_method_filter_parses_method_names() {
        let args = parse(&["--method", "KNN"]).unwrap();
        assert_eq!(args.method, Some(ImputationMethod::Knn));

        let args = parse(&["--method", "forward_fill"]).unwrap();
        assert_eq!(args.method, Some(ImputationMethod::ForwardFill));

        assert!(parse(&[]).unwrap().method.is_none());
    }

    #[test]
    fn test_method_filter_rejects_unknown_method() {
        let err = parse(&["--method", "magic"]).unwrap_err();
        assert!(err.to_string().contains("unknown imputation method"));
    }

    #[test]
    fn test_shown_suggestions_filters_by_method() {
        let suggestions = funimpute::analyze_imputation_requirements(
            concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test_metadata.csv"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test_data.csv"),
        )
        .unwrap();

        assert_eq!(shown_suggestions(&suggestions, None).len(), suggestions.len());

        let regression = shown_suggestions(&suggestions, Some(ImputationMethod::Regression));
        assert!(regression.iter().any(|s| s.column_name == "income"));
        assert!(
            regression
                .iter()
                .all(|s| s.proposed_method == ImputationMethod::Regression)
        );

        // only user_id is complete
        let complete = shown_suggestions(&suggestions, Some(ImputationMethod::NoImputation));
        assert_eq!(complete.len(), 1);
        assert_eq!(complete[0].column_name, "user_id");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 19), "short");
        assert_eq!(truncate_str("a_very_long_column_name", 10), "a_very_...");
    }
}
