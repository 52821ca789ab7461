//! Column profiling for imputation analysis.
//!
//! This module provides:
//! - Materialization of every data column with a uniform notion of "missing"
//! - Per-column statistics (missing ratio, numeric summary, outliers, mode)
//! - Constraint checking against declared metadata
//! - Missingness mechanism classification

mod constraints;
pub mod mechanism;
mod statistics;

pub use constraints::ConstraintReport;
pub use mechanism::{MechanismAssessment, classify_mechanism};
pub use statistics::NumericSummary;

use crate::config::AnalysisConfig;
use crate::error::{ImputeError, Result};
use crate::types::{ColumnMetadata, ColumnType};
use crate::utils::{
    DtypeCategory, get_dtype_category, is_missing_marker, parse_numeric_string, series_to_f64,
    series_to_strings,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// One data column, materialized for analysis.
#[derive(Debug, Clone)]
pub struct ColumnData {
    pub name: String,
    /// Declared type, when the column has metadata.
    pub declared: Option<ColumnType>,
    pub is_numeric: bool,
    /// Trimmed text of present cells; `None` where the cell is missing.
    pub text: Vec<Option<String>>,
    /// Parsed values for numeric columns; `None` where missing or unparseable.
    pub numeric: Option<Vec<Option<f64>>>,
    pub missing: Vec<bool>,
    /// Present cells of a numeric column that did not parse as numbers.
    pub type_violations: usize,
}

impl ColumnData {
    /// Materialize a series, applying the configured missing-value rules.
    pub fn from_series(
        series: &Series,
        declared: Option<ColumnType>,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let name = series.name().to_string();
        let raw = series_to_strings(series)?;

        let mut text = Vec::with_capacity(raw.len());
        let mut missing = Vec::with_capacity(raw.len());
        for value in raw {
            let value = value.map(|v| v.trim().to_string()).filter(|v| {
                !v.is_empty() && !(config.treat_markers_as_missing && is_missing_marker(v))
            });
            missing.push(value.is_none());
            text.push(value);
        }

        let dtype_category = get_dtype_category(series.dtype());
        let is_numeric = match declared {
            Some(column_type) => column_type.is_numeric(),
            None => dtype_category == DtypeCategory::Numeric,
        };

        let mut type_violations = 0;
        let numeric = if !is_numeric {
            None
        } else if dtype_category == DtypeCategory::Numeric {
            let values = series_to_f64(series)?;
            Some(
                values
                    .into_iter()
                    .zip(&missing)
                    .map(|(v, &is_missing)| if is_missing { None } else { v })
                    .collect(),
            )
        } else {
            let values = text
                .iter()
                .map(|cell| match cell {
                    Some(raw) => {
                        let parsed = parse_numeric_string(raw);
                        if parsed.is_none() {
                            type_violations += 1;
                        }
                        parsed
                    }
                    None => None,
                })
                .collect();
            Some(values)
        };

        Ok(Self {
            name,
            declared,
            is_numeric,
            text,
            numeric,
            missing,
            type_violations,
        })
    }

    pub fn len(&self) -> usize {
        self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.iter().filter(|&&m| m).count()
    }

    /// Present numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.numeric
            .as_ref()
            .map(|values| values.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

/// Every column of a data frame, materialized once per analysis.
#[derive(Debug, Clone)]
pub struct DatasetView {
    rows: usize,
    columns: Vec<ColumnData>,
}

impl DatasetView {
    /// Build the view; columns with metadata use their declared type.
    ///
    /// Columns without metadata that cannot be read as text (lists, structs,
    /// binary) are left out with a warning. A described column that fails to
    /// materialize is an error.
    pub fn build(
        df: &DataFrame,
        metadata: &[ColumnMetadata],
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let declared: HashMap<&str, ColumnType> = metadata
            .iter()
            .map(|m| (m.column_name.as_str(), m.data_type))
            .collect();

        let mut columns = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let column_type = declared.get(series.name().as_str()).copied();

            if column_type.is_some() {
                columns.push(ColumnData::from_series(series, column_type, config)?);
                continue;
            }

            if get_dtype_category(series.dtype()) == DtypeCategory::Other {
                warn!(
                    "Skipping column '{}' without metadata: unsupported dtype {}",
                    series.name(),
                    series.dtype()
                );
                continue;
            }
            match ColumnData::from_series(series, None, config) {
                Ok(data) => columns.push(data),
                Err(e) => warn!(
                    "Skipping column '{}' without metadata: {}",
                    series.name(),
                    e
                ),
            }
        }

        debug!(
            "Materialized {} columns over {} rows",
            columns.len(),
            df.height()
        );
        Ok(Self {
            rows: df.height(),
            columns,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[ColumnData] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether a numeric column other than `name` exists.
    pub fn has_other_numeric(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name != name && c.is_numeric)
    }
}

/// Profile of one metadata column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub total_rows: usize,
    pub missing_count: usize,
    pub missing_ratio: f64,
    pub present_count: usize,
    pub unique_count: usize,
    pub numeric: Option<NumericSummary>,
    pub outlier_count: usize,
    /// Values outside the declared min/max bounds.
    pub bound_violations: usize,
    pub constraint_violations: usize,
    /// Most frequent present value.
    pub mode: Option<String>,
}

impl ColumnProfile {
    pub fn missing_percentage(&self) -> f64 {
        self.missing_ratio * 100.0
    }

    pub fn outlier_ratio(&self) -> f64 {
        if self.present_count == 0 {
            0.0
        } else {
            self.outlier_count as f64 / self.present_count as f64
        }
    }

    pub fn is_skewed(&self, threshold: f64) -> bool {
        self.numeric
            .as_ref()
            .is_some_and(|n| n.skewness.abs() >= threshold)
    }
}

/// Column profiler.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile a metadata column against its materialized data.
    pub fn profile_column(
        meta: &ColumnMetadata,
        data: &ColumnData,
        config: &AnalysisConfig,
    ) -> Result<ColumnProfile> {
        if data.name != meta.column_name {
            return Err(ImputeError::AnalysisFailed {
                column: meta.column_name.clone(),
                reason: format!("profiled against data column '{}'", data.name),
            });
        }

        let total_rows = data.len();
        let missing_count = data.missing_count();
        let present_count = total_rows - missing_count;
        let missing_ratio = if total_rows > 0 {
            missing_count as f64 / total_rows as f64
        } else {
            0.0
        };

        let unique_count = data
            .text
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len();

        let values = data.numeric_values();
        let numeric = if data.is_numeric {
            NumericSummary::from_values(&values)
        } else {
            None
        };
        let outlier_count = numeric
            .as_ref()
            .map(|summary| {
                statistics::count_iqr_outliers(&values, summary, config.outlier_iqr_multiplier)
            })
            .unwrap_or(0);

        let constraints = ConstraintReport::check(meta, data);

        Ok(ColumnProfile {
            name: meta.column_name.clone(),
            column_type: meta.data_type,
            total_rows,
            missing_count,
            missing_ratio,
            present_count,
            unique_count,
            numeric,
            outlier_count,
            bound_violations: constraints.bound_violations,
            constraint_violations: constraints.total(),
            mode: most_frequent(&data.text),
        })
    }
}

/// Most frequent present value; ties go to the value seen first.
fn most_frequent(text: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, value) in text.iter().enumerate() {
        if let Some(value) = value {
            let entry = counts.entry(value.as_str()).or_insert((0, idx));
            entry.0 += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    #[test]
    fn test_column_data_numeric_dtype() {
        let series = Series::new("age".into(), &[Some(25i64), None, Some(35)]);
        let data = ColumnData::from_series(&series, Some(ColumnType::Integer), &config()).unwrap();

        assert!(data.is_numeric);
        assert_eq!(data.missing, vec![false, true, false]);
        assert_eq!(data.numeric_values(), vec![25.0, 35.0]);
        assert_eq!(data.type_violations, 0);
    }

    #[test]
    fn test_column_data_markers_and_blanks_are_missing() {
        let series = Series::new("c".into(), &[Some("A"), Some("  "), Some("N/A"), None]);
        let data = ColumnData::from_series(&series, None, &config()).unwrap();
        assert_eq!(data.missing, vec![false, true, true, true]);

        let keep_markers = AnalysisConfig::builder()
            .treat_markers_as_missing(false)
            .build()
            .unwrap();
        let data = ColumnData::from_series(&series, None, &keep_markers).unwrap();
        assert_eq!(data.missing, vec![false, true, false, true]);
    }

    #[test]
    fn test_column_data_declared_numeric_text() {
        let series = Series::new("income".into(), &["$50,000", "oops", "", "60000"]);
        let data = ColumnData::from_series(&series, Some(ColumnType::Float), &config()).unwrap();

        assert!(data.is_numeric);
        assert_eq!(data.numeric_values(), vec![50000.0, 60000.0]);
        assert_eq!(data.type_violations, 1);
        assert_eq!(data.missing_count(), 1);
    }

    #[test]
    fn test_declared_type_overrides_dtype() {
        let series = Series::new("code".into(), &[1i64, 2, 1]);
        let data =
            ColumnData::from_series(&series, Some(ColumnType::Categorical), &config()).unwrap();
        assert!(!data.is_numeric);
        assert!(data.numeric.is_none());
    }

    #[test]
    fn test_dataset_view_lookup() {
        let df = df![
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"],
        ]
        .unwrap();
        let view = DatasetView::build(&df, &[], &config()).unwrap();

        assert_eq!(view.rows(), 3);
        assert!(view.contains("b"));
        assert!(!view.contains("c"));
        assert!(view.has_other_numeric("b"));
        assert!(!view.has_other_numeric("a"));
    }

    fn frame_with_list_column() -> DataFrame {
        let age = Series::new("age".into(), &[Some(1i64), None, Some(3)]);
        let tags = Series::new(
            "tags".into(),
            [
                Series::new("".into(), &[1i64, 2]),
                Series::new("".into(), &[3i64]),
                Series::new("".into(), &[4i64, 5, 6]),
            ],
        );
        DataFrame::new(vec![age.into(), tags.into()]).unwrap()
    }

    #[test]
    fn test_dataset_view_skips_undescribed_list_column() {
        let df = frame_with_list_column();
        let meta = ColumnMetadata::new("age", ColumnType::Integer);

        let view = DatasetView::build(&df, std::slice::from_ref(&meta), &config()).unwrap();
        assert_eq!(view.rows(), 3);
        assert_eq!(view.columns().len(), 1);
        assert!(view.contains("age"));
        assert!(!view.contains("tags"));
    }

    #[test]
    fn test_dataset_view_fails_on_described_list_column() {
        let df = frame_with_list_column();
        let metadata = vec![
            ColumnMetadata::new("age", ColumnType::Integer),
            ColumnMetadata::new("tags", ColumnType::String),
        ];
        assert!(DatasetView::build(&df, &metadata, &config()).is_err());
    }

    #[test]
    fn test_profile_column_numeric() {
        let df = df!["age" => [Some(25i64), None, Some(35), Some(42), None]].unwrap();
        let meta = ColumnMetadata::new("age", ColumnType::Integer)
            .with_min_value(0.0)
            .with_max_value(40.0);
        let view = DatasetView::build(&df, std::slice::from_ref(&meta), &config()).unwrap();
        let data = view.get("age").unwrap();

        let profile = DataProfiler::profile_column(&meta, data, &config()).unwrap();
        assert_eq!(profile.total_rows, 5);
        assert_eq!(profile.missing_count, 2);
        assert!((profile.missing_ratio - 0.4).abs() < 1e-9);
        assert_eq!(profile.present_count, 3);
        assert_eq!(profile.unique_count, 3);
        assert_eq!(profile.bound_violations, 1);
        assert_eq!(profile.numeric.as_ref().unwrap().median, 35.0);
    }

    #[test]
    fn test_profile_column_mode_tie_prefers_first() {
        let df = df!["category" => [Some("B"), Some("A"), None, Some("A"), Some("B")]].unwrap();
        let meta = ColumnMetadata::new("category", ColumnType::Categorical);
        let view = DatasetView::build(&df, std::slice::from_ref(&meta), &config()).unwrap();

        let profile =
            DataProfiler::profile_column(&meta, view.get("category").unwrap(), &config()).unwrap();
        assert_eq!(profile.mode.as_deref(), Some("B"));
        assert!(profile.numeric.is_none());
    }

    #[test]
    fn test_profile_column_rejects_mismatched_data() {
        let df = df!["a" => [1i64], "b" => [2i64]].unwrap();
        let view = DatasetView::build(&df, &[], &config()).unwrap();
        let meta = ColumnMetadata::new("a", ColumnType::Integer);

        let err = DataProfiler::profile_column(&meta, view.get("b").unwrap(), &config())
            .unwrap_err();
        assert_eq!(err.error_code(), "ANALYSIS_FAILED");
    }
}
