//! Checks of observed values against declared metadata constraints.

use super::ColumnData;
use crate::types::{ColumnMetadata, ColumnType};
use std::collections::HashMap;

/// Counts of constraint violations in one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintReport {
    /// Unparseable numbers, or fractional values in an integer column.
    pub type_violations: usize,
    pub bound_violations: usize,
    pub length_violations: usize,
    pub allowed_value_violations: usize,
    /// Extra occurrences of repeated values in a unique column.
    pub duplicate_violations: usize,
}

impl ConstraintReport {
    pub fn check(meta: &ColumnMetadata, data: &ColumnData) -> Self {
        let mut report = ConstraintReport {
            type_violations: data.type_violations,
            ..Default::default()
        };

        if let Some(values) = &data.numeric {
            for value in values.iter().flatten() {
                if meta.data_type == ColumnType::Integer && value.fract() != 0.0 {
                    report.type_violations += 1;
                }
                let below = meta.min_value.is_some_and(|min| *value < min);
                let above = meta.max_value.is_some_and(|max| *value > max);
                if below || above {
                    report.bound_violations += 1;
                }
            }
        }

        if let Some(max_length) = meta.max_length {
            report.length_violations = data
                .text
                .iter()
                .flatten()
                .filter(|v| v.chars().count() > max_length)
                .count();
        }

        if !meta.allowed_values.is_empty() {
            report.allowed_value_violations = data
                .text
                .iter()
                .flatten()
                .filter(|v| !meta.allowed_values.iter().any(|allowed| allowed == *v))
                .count();
        }

        if meta.unique_flag {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for value in data.text.iter().flatten() {
                *seen.entry(value.as_str()).or_insert(0) += 1;
            }
            report.duplicate_violations = seen.values().map(|count| count - 1).sum();
        }

        report
    }

    pub fn total(&self) -> usize {
        self.type_violations
            + self.bound_violations
            + self.length_violations
            + self.allowed_value_violations
            + self.duplicate_violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use polars::prelude::*;

    fn data_for(series: &Series, column_type: ColumnType) -> ColumnData {
        ColumnData::from_series(series, Some(column_type), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_bounds_and_integer_type() {
        let series = Series::new("age".into(), &[Some(-1.0f64), Some(30.5), None, Some(130.0)]);
        let meta = ColumnMetadata::new("age", ColumnType::Integer)
            .with_min_value(0.0)
            .with_max_value(120.0);

        let report = ConstraintReport::check(&meta, &data_for(&series, ColumnType::Integer));
        assert_eq!(report.bound_violations, 2);
        assert_eq!(report.type_violations, 1);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_allowed_values_and_length() {
        let series = Series::new("category".into(), &[Some("A"), Some("D"), None, Some("LONG")]);
        let meta = ColumnMetadata::new("category", ColumnType::Categorical)
            .with_allowed_values(["A", "B", "C"])
            .with_max_length(3);

        let report = ConstraintReport::check(&meta, &data_for(&series, ColumnType::Categorical));
        assert_eq!(report.allowed_value_violations, 2);
        assert_eq!(report.length_violations, 1);
    }

    #[test]
    fn test_duplicates_in_unique_column() {
        let series = Series::new("user_id".into(), &[1i64, 2, 2, 3, 3, 3]);
        let meta = ColumnMetadata::new("user_id", ColumnType::Integer).with_unique_flag(true);

        let report = ConstraintReport::check(&meta, &data_for(&series, ColumnType::Integer));
        assert_eq!(report.duplicate_violations, 3);
    }

    #[test]
    fn test_clean_column_has_no_violations() {
        let series = Series::new("user_id".into(), &[1i64, 2, 3]);
        let meta = ColumnMetadata::new("user_id", ColumnType::Integer).with_unique_flag(true);

        let report = ConstraintReport::check(&meta, &data_for(&series, ColumnType::Integer));
        assert_eq!(report, ConstraintReport::default());
    }
}
