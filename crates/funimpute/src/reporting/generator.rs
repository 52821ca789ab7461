use crate::error::{ImputeError, Result, ResultExt};
use crate::types::ImputationSuggestion;
use crate::utils::round3;
use chrono::Utc;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Full analysis report, used for `--json` output and `--report` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// RFC 3339 timestamp (UTC) of report creation
    pub generated_at: String,
    /// Version of the library that produced the report
    pub library_version: String,
    /// Number of rows in the analyzed dataset
    pub rows: usize,
    /// Number of columns in the analyzed dataset
    pub columns: usize,
    pub summary: ReportSummary,
    /// Per-column suggestions, in metadata order
    pub suggestions: Vec<ImputationSuggestion>,
}

/// Aggregate view over all suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub columns_analyzed: usize,
    pub columns_with_missing: usize,
    pub total_missing_values: usize,
    /// Mean confidence over columns that need imputation (0 when none do)
    pub average_confidence: f64,
    /// Count of columns per proposed method, keyed by method name
    pub method_counts: BTreeMap<String, usize>,
    /// Count of columns per missingness mechanism
    pub mechanism_counts: BTreeMap<String, usize>,
}

impl ReportSummary {
    pub fn from_suggestions(suggestions: &[ImputationSuggestion]) -> Self {
        let mut summary = ReportSummary {
            columns_analyzed: suggestions.len(),
            ..Default::default()
        };

        let mut confidence_total = 0.0;
        for suggestion in suggestions {
            *summary
                .method_counts
                .entry(suggestion.proposed_method.as_str().to_string())
                .or_insert(0) += 1;
            *summary
                .mechanism_counts
                .entry(suggestion.mechanism.as_str().to_string())
                .or_insert(0) += 1;

            if suggestion.needs_imputation() {
                summary.columns_with_missing += 1;
                summary.total_missing_values += suggestion.missing_count;
                confidence_total += suggestion.confidence_score;
            }
        }

        if summary.columns_with_missing > 0 {
            summary.average_confidence =
                round3(confidence_total / summary.columns_with_missing as f64);
        }
        summary
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds and writes analysis reports.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Assemble a report for a dataset of `rows` × `columns`.
    pub fn generate(
        suggestions: &[ImputationSuggestion],
        rows: usize,
        columns: usize,
    ) -> AnalysisReport {
        AnalysisReport {
            generated_at: Utc::now().to_rfc3339(),
            library_version: crate::VERSION.to_string(),
            rows,
            columns,
            summary: ReportSummary::from_suggestions(suggestions),
            suggestions: suggestions.to_vec(),
        }
    }

    /// Write the report as pretty-printed JSON, creating parent directories.
    pub fn save_json(report: &AnalysisReport, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;

        let body = serde_json::to_string_pretty(report)?;
        let mut file = File::create(path)?;
        file.write_all(body.as_bytes())?;

        info!("Report saved: {}", path.display());
        Ok(())
    }

    /// Export one row per suggestion as CSV.
    pub fn export_suggestions_csv(
        suggestions: &[ImputationSuggestion],
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;

        let mut df = suggestions_frame(suggestions).context("Building suggestions table")?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .context("Writing suggestions CSV")?;

        info!(
            "Exported {} suggestions to {}",
            suggestions.len(),
            path.display()
        );
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ImputeError::ReportGenerationFailed(format!(
                "cannot create {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Flatten suggestions into a table with one row per column.
fn suggestions_frame(suggestions: &[ImputationSuggestion]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = suggestions.iter().map(|s| s.column_name.as_str()).collect();
    let missing: Vec<u64> = suggestions.iter().map(|s| s.missing_count as u64).collect();
    let missing_pct: Vec<f64> = suggestions.iter().map(|s| s.missing_percentage).collect();
    let mechanisms: Vec<&str> = suggestions.iter().map(|s| s.mechanism.as_str()).collect();
    let related: Vec<String> = suggestions
        .iter()
        .map(|s| s.related_columns.join("|"))
        .collect();
    let methods: Vec<&str> = suggestions
        .iter()
        .map(|s| s.proposed_method.as_str())
        .collect();
    let confidence: Vec<f64> = suggestions.iter().map(|s| s.confidence_score).collect();
    let outliers: Vec<u64> = suggestions.iter().map(|s| s.outlier_count as u64).collect();
    let handling: Vec<&str> = suggestions
        .iter()
        .map(|s| s.outlier_handling.as_str())
        .collect();
    let violations: Vec<u64> = suggestions
        .iter()
        .map(|s| s.constraint_violations as u64)
        .collect();
    let rationale: Vec<&str> = suggestions.iter().map(|s| s.rationale.as_str()).collect();

    DataFrame::new(vec![
        Column::new("column_name".into(), names),
        Column::new("missing_count".into(), missing),
        Column::new("missing_percentage".into(), missing_pct),
        Column::new("mechanism".into(), mechanisms),
        Column::new("related_columns".into(), related),
        Column::new("proposed_method".into(), methods),
        Column::new("confidence_score".into(), confidence),
        Column::new("outlier_count".into(), outliers),
        Column::new("outlier_handling".into(), handling),
        Column::new("constraint_violations".into(), violations),
        Column::new("rationale".into(), rationale),
    ])
}
