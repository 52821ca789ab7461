//! Missingness mechanism classification.
//!
//! A column's missing indicator is tested against every other column with
//! `anofox_statistics`: numeric columns through the point-biserial (Pearson)
//! correlation, everything else through Cramér's V of the category ×
//! indicator table. Columns whose association reaches the configured
//! threshold explain the missingness (MAR).

use super::{ColumnData, DatasetView};
use crate::config::AnalysisConfig;
use crate::types::MissingnessMechanism;
use anofox_statistics::categorical::cramers_v;
use anofox_statistics::correlation::pearson;
use std::collections::HashMap;
use tracing::debug;

/// Result of classifying one column.
#[derive(Debug, Clone, PartialEq)]
pub struct MechanismAssessment {
    pub mechanism: MissingnessMechanism,
    /// Associated columns with their strength, strongest first.
    pub related: Vec<(String, f64)>,
}

impl MechanismAssessment {
    fn plain(mechanism: MissingnessMechanism) -> Self {
        Self {
            mechanism,
            related: Vec::new(),
        }
    }

    pub fn related_names(&self) -> Vec<String> {
        self.related.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// Classify why values of `target` are missing.
pub fn classify_mechanism(
    target: &ColumnData,
    view: &DatasetView,
    config: &AnalysisConfig,
) -> MechanismAssessment {
    let total = target.len();
    let missing = target.missing_count();

    if missing == 0 {
        return MechanismAssessment::plain(MissingnessMechanism::NoMissing);
    }
    if missing == total || total < config.min_rows_for_mechanism {
        return MechanismAssessment::plain(MissingnessMechanism::Undetermined);
    }

    let mut related: Vec<(String, f64)> = view
        .columns()
        .iter()
        .filter(|other| other.name != target.name && other.len() == total)
        .filter_map(|other| {
            let strength = if other.is_numeric {
                point_biserial(&target.missing, other)
            } else {
                category_association(&target.missing, other)
            }?;
            debug!(
                "Missingness of '{}' vs '{}': association {:.3}",
                target.name, other.name, strength
            );
            (strength >= config.mar_association_threshold).then(|| (other.name.clone(), strength))
        })
        .collect();

    if related.is_empty() {
        return MechanismAssessment::plain(MissingnessMechanism::Mcar);
    }

    related.sort_by(|a, b| b.1.total_cmp(&a.1));
    MechanismAssessment {
        mechanism: MissingnessMechanism::Mar,
        related,
    }
}

/// Absolute point-biserial correlation: Pearson's r between a numeric column
/// and the 0/1 missing indicator, over rows where the column has a value.
fn point_biserial(indicator: &[bool], other: &ColumnData) -> Option<f64> {
    let values = other.numeric.as_ref()?;
    let (x, y): (Vec<f64>, Vec<f64>) = indicator
        .iter()
        .zip(values)
        .filter_map(|(&is_missing, value)| {
            value
                .filter(|v| v.is_finite())
                .map(|v| (v, if is_missing { 1.0 } else { 0.0 }))
        })
        .unzip();

    let missing_rows = y.iter().filter(|flag| **flag == 1.0).count();
    let present_rows = y.len() - missing_rows;
    if missing_rows < 2 || present_rows < 2 {
        return None;
    }

    // A constant column yields a NaN estimate
    let result = pearson(&x, &y, None).ok()?;
    result.estimate.is_finite().then(|| result.estimate.abs())
}

/// Cramér's V of the category × (missing, present) contingency table.
fn category_association(indicator: &[bool], other: &ColumnData) -> Option<f64> {
    let contingency = build_contingency_table(indicator, other)?;

    let n: usize = contingency.iter().flatten().sum();
    let k = contingency.len();
    if k < 2 || 2 * k > n {
        return None;
    }

    let total_missing: usize = contingency.iter().map(|row| row[0]).sum();
    if total_missing == 0 || total_missing == n {
        return None;
    }

    let result = cramers_v(&contingency).ok()?;
    result
        .estimate
        .is_finite()
        .then(|| result.estimate.min(1.0))
}

/// One row per category, columns are `[missing, present]`.
fn build_contingency_table(indicator: &[bool], other: &ColumnData) -> Option<Vec<Vec<usize>>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut table: Vec<Vec<usize>> = Vec::new();

    for (&is_missing, value) in indicator.iter().zip(&other.text) {
        let Some(value) = value else { continue };
        let row = *index.entry(value.as_str()).or_insert_with(|| {
            table.push(vec![0, 0]);
            table.len() - 1
        });
        table[row][if is_missing { 0 } else { 1 }] += 1;
    }

    (!table.is_empty()).then_some(table)
}
