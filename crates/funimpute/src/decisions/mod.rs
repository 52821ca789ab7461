//! Decision-making module for imputation strategy selection.
//!
//! A [`DecisionEngine`] turns the evidence gathered for one column into an
//! [`ImputationSuggestion`]. The crate ships a rule-based engine; callers can
//! plug in their own through the analyzer builder.

mod references;
mod rule_engine;

pub use references::referenced_columns;
pub use rule_engine::RuleBasedDecisionEngine;

use crate::error::Result;
use crate::profiler::{ColumnProfile, DatasetView, MechanismAssessment};
use crate::types::{ColumnMetadata, ImputationSuggestion};
use serde::Serialize;

/// Trait for decision-making engines.
///
/// Implementations can use heuristics, learned models or external services.
pub trait DecisionEngine: Send + Sync {
    /// Produce the suggestion for a single column.
    fn suggest(&self, ctx: &ColumnContext<'_>) -> Result<ImputationSuggestion>;
}

/// Why a column was picked as a predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorSource {
    DependentColumn,
    BusinessRule,
    Missingness,
}

/// A column that can help predict the missing values of another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predictor {
    pub name: String,
    pub is_numeric: bool,
    pub source: PredictorSource,
}

/// Everything an engine knows about one column.
#[derive(Debug, Clone)]
pub struct ColumnContext<'a> {
    pub metadata: &'a ColumnMetadata,
    pub profile: &'a ColumnProfile,
    pub mechanism: &'a MechanismAssessment,
    pub predictors: Vec<Predictor>,
    /// Whether any other numeric column exists in the data.
    pub has_other_numeric: bool,
}

impl<'a> ColumnContext<'a> {
    pub fn new(
        metadata: &'a ColumnMetadata,
        profile: &'a ColumnProfile,
        mechanism: &'a MechanismAssessment,
        view: &DatasetView,
    ) -> Self {
        Self {
            metadata,
            profile,
            mechanism,
            predictors: collect_predictors(metadata, mechanism, view),
            has_other_numeric: view.has_other_numeric(&metadata.column_name),
        }
    }

    pub fn has_numeric_predictor(&self) -> bool {
        self.predictors.iter().any(|p| p.is_numeric)
    }

    pub fn predictor_names(&self) -> Vec<String> {
        self.predictors.iter().map(|p| p.name.clone()).collect()
    }
}

/// Dependent column, then business-rule references, then MAR evidence.
///
/// Only columns present in the data count; duplicates keep their first source.
pub fn collect_predictors(
    metadata: &ColumnMetadata,
    mechanism: &MechanismAssessment,
    view: &DatasetView,
) -> Vec<Predictor> {
    let own = metadata.column_name.as_str();
    let mut candidates: Vec<(String, PredictorSource)> = Vec::new();

    if let Some(dep) = &metadata.dependent_column {
        candidates.push((dep.clone(), PredictorSource::DependentColumn));
    }
    if let Some(rule) = &metadata.business_rule {
        let names = view.columns().iter().map(|c| c.name.as_str());
        for name in referenced_columns(rule, names, own) {
            candidates.push((name, PredictorSource::BusinessRule));
        }
    }
    for name in mechanism.related_names() {
        candidates.push((name, PredictorSource::Missingness));
    }

    let mut predictors: Vec<Predictor> = Vec::new();
    for (name, source) in candidates {
        if name == own || predictors.iter().any(|p| p.name == name) {
            continue;
        }
        if let Some(data) = view.get(&name) {
            predictors.push(Predictor {
                name,
                is_numeric: data.is_numeric,
                source,
            });
        }
    }
    predictors
}
