//! FunImpute: imputation strategy analysis.
//!
//! Given a dataset and a metadata file describing its columns, FunImpute
//! explains how much of each column is missing, why it is likely missing, and
//! which imputation method fits best, with a rationale and a confidence score.
//! It also flags outliers and values that break the declared constraints.
//! Nothing is imputed; the output is a list of suggestions.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! // From files
//! let suggestions = funimpute::analyze_imputation_requirements("metadata.csv", "data.csv")?;
//!
//! for s in &suggestions {
//!     println!(
//!         "{}: {} ({:.1}% missing, {}) confidence {:.3}",
//!         s.column_name, s.proposed_method, s.missing_percentage, s.mechanism, s.confidence_score
//!     );
//! }
//!
//! // From a DataFrame already in memory
//! use funimpute::{ColumnMetadata, ColumnType};
//!
//! let metadata = vec![
//!     ColumnMetadata::new("age", ColumnType::Integer).with_min_value(0.0).with_max_value(120.0),
//!     ColumnMetadata::new("income", ColumnType::Float).with_business_rule("Correlates with age"),
//! ];
//! let suggestions = funimpute::analyze_dataframe(&df, &metadata)?;
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to tune the thresholds behind each decision:
//!
//! ```rust,ignore
//! use funimpute::{AnalysisConfig, ImputationAnalyzer};
//!
//! let config = AnalysisConfig::builder()
//!     .low_missing_threshold(0.1)      // Mean/median up to 10% missing
//!     .high_missing_threshold(0.6)     // Manual backfill above 60%
//!     .skip_missing_columns(true)
//!     .build()?;
//!
//! let suggestions = ImputationAnalyzer::with_config(config).analyze("metadata.csv", "data.csv")?;
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`ImputeError`]. Missing input files map
//! to [`ImputeError::FileNotFound`], which says whether the metadata or the
//! data file was absent.

pub mod analyzer;
pub mod config;
pub mod decisions;
pub mod error;
pub mod loader;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

use polars::prelude::DataFrame;
use std::path::Path;

// Re-exports for convenient access
pub use analyzer::{ImputationAnalyzer, ImputationAnalyzerBuilder, SimpleImputationAnalyzer};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use decisions::{ColumnContext, DecisionEngine, RuleBasedDecisionEngine};
pub use error::{ImputeError, InputKind, Result, ResultExt};
pub use loader::{load_data, load_metadata, validate_metadata};
pub use profiler::{ColumnProfile, DataProfiler, MechanismAssessment};
pub use reporting::{AnalysisReport, ReportGenerator, ReportSummary};
pub use types::{
    ColumnMetadata, ColumnType, ImputationMethod, ImputationSuggestion, MissingnessMechanism,
    OutlierHandling,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library authors.
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Analyze a metadata file and a data file with the default configuration.
pub fn analyze_imputation_requirements(
    metadata_path: impl AsRef<Path>,
    data_path: impl AsRef<Path>,
) -> Result<Vec<ImputationSuggestion>> {
    ImputationAnalyzer::new().analyze(metadata_path, data_path)
}

/// Analyze an in-memory data frame with the default configuration.
pub fn analyze_dataframe(
    df: &DataFrame,
    metadata: &[ColumnMetadata],
) -> Result<Vec<ImputationSuggestion>> {
    ImputationAnalyzer::new().analyze_dataframe(df, metadata)
}
