//! Imputation analyzer.
//!
//! This module provides the `ImputationAnalyzer` struct and its builder, which
//! tie the loader, profiler and decision engine together.

use crate::config::AnalysisConfig;
use crate::decisions::{ColumnContext, DecisionEngine, RuleBasedDecisionEngine};
use crate::error::{ImputeError, Result};
use crate::loader::{load_data, load_metadata, validate_metadata};
use crate::profiler::{DataProfiler, DatasetView, classify_mechanism};
use crate::types::{ColumnMetadata, ImputationSuggestion};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyzes a dataset against its column metadata and proposes an
/// imputation strategy for every described column.
///
/// # Example
///
/// ```rust,ignore
/// use funimpute::{AnalysisConfig, ImputationAnalyzer};
///
/// // Defaults
/// let suggestions = ImputationAnalyzer::new().analyze("metadata.csv", "data.csv")?;
///
/// // Custom thresholds
/// let analyzer = ImputationAnalyzer::builder()
///     .config(AnalysisConfig::builder().high_missing_threshold(0.6).build()?)
///     .build()?;
/// let suggestions = analyzer.analyze_dataframe(&df, &metadata)?;
/// ```
pub struct ImputationAnalyzer {
    config: AnalysisConfig,
    engine: Arc<dyn DecisionEngine>,
}

/// Name kept for callers of the simple analyzer class.
pub type SimpleImputationAnalyzer = ImputationAnalyzer;

// Analyzers are shared across threads by embedding applications
static_assertions::assert_impl_all!(ImputationAnalyzer: Send, Sync);

impl Default for ImputationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImputationAnalyzer {
    /// Analyzer with the default configuration and rule-based engine.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Analyzer with the rule-based engine and the given configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        let engine = Arc::new(RuleBasedDecisionEngine::new(config.clone()));
        Self { config, engine }
    }

    pub fn builder() -> ImputationAnalyzerBuilder {
        ImputationAnalyzerBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load both files and analyze them.
    ///
    /// Metadata is loaded first, so a missing metadata file is reported even
    /// when the data file is missing too.
    pub fn analyze(
        &self,
        metadata_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
    ) -> Result<Vec<ImputationSuggestion>> {
        let metadata = load_metadata(metadata_path)?;
        let df = load_data(data_path)?;
        self.analyze_dataframe(&df, &metadata)
    }

    /// Analyze an in-memory data frame.
    ///
    /// Suggestions come back in metadata order, one per analyzed column.
    pub fn analyze_dataframe(
        &self,
        df: &DataFrame,
        metadata: &[ColumnMetadata],
    ) -> Result<Vec<ImputationSuggestion>> {
        let start_time = Instant::now();
        validate_metadata(metadata)?;

        info!(
            "Analyzing {} columns over {} rows",
            metadata.len(),
            df.height()
        );

        let view = DatasetView::build(df, metadata, &self.config)?;
        let mut suggestions = Vec::with_capacity(metadata.len());

        for meta in metadata {
            let Some(data) = view.get(&meta.column_name) else {
                if self.config.skip_missing_columns {
                    warn!(
                        "Column '{}' is described in metadata but absent from the data; skipping",
                        meta.column_name
                    );
                    continue;
                }
                return Err(ImputeError::ColumnNotFound(meta.column_name.clone()));
            };

            let profile = DataProfiler::profile_column(meta, data, &self.config)?;
            let mechanism = classify_mechanism(data, &view, &self.config);
            let ctx = ColumnContext::new(meta, &profile, &mechanism, &view);
            let suggestion = self.engine.suggest(&ctx).map_err(|e| {
                e.with_context(format!("Deciding strategy for '{}'", meta.column_name))
            })?;

            debug!(
                "{}: {} missing, {} -> {} ({:.3})",
                suggestion.column_name,
                suggestion.missing_count,
                suggestion.mechanism.as_str(),
                suggestion.proposed_method.as_str(),
                suggestion.confidence_score
            );
            suggestions.push(suggestion);
        }

        let needing = suggestions.iter().filter(|s| s.needs_imputation()).count();
        info!(
            "Analysis complete in {:.2?}: {} of {} columns need imputation",
            start_time.elapsed(),
            needing,
            suggestions.len()
        );
        Ok(suggestions)
    }
}

/// Builder for [`ImputationAnalyzer`].
#[derive(Default)]
pub struct ImputationAnalyzerBuilder {
    config: Option<AnalysisConfig>,
    engine: Option<Arc<dyn DecisionEngine>>,
}

impl ImputationAnalyzerBuilder {
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the rule-based engine.
    pub fn decision_engine(mut self, engine: Arc<dyn DecisionEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Validate the configuration and build the analyzer.
    pub fn build(self) -> Result<ImputationAnalyzer> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let engine = match self.engine {
            Some(engine) => engine,
            None => Arc::new(RuleBasedDecisionEngine::new(config.clone())),
        };
        Ok(ImputationAnalyzer { config, engine })
    }
}
