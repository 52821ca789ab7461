//! Configuration types for imputation analysis.
//!
//! This module provides the thresholds that drive the rule-based decision
//! engine, using the builder pattern for ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ImputeError, InputKind, Result};

/// Configuration for imputation analysis.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use funimpute::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .high_missing_threshold(0.6)
///     .mar_association_threshold(0.25)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Missing ratio up to which simple statistics (mean/median) are trusted.
    /// Default: 0.05
    pub low_missing_threshold: f64,

    /// Missing ratio up to which neighbour-based imputation is suggested.
    /// Default: 0.30
    pub moderate_missing_threshold: f64,

    /// Missing ratio above which the column is sent back for manual backfill.
    /// Default: 0.50
    pub high_missing_threshold: f64,

    /// Missing ratio up to which categorical columns use the mode.
    /// Default: 0.10
    pub categorical_mode_threshold: f64,

    /// Minimum association between a missing indicator and another column
    /// for the missingness to be classified as MAR.
    /// Default: 0.30
    pub mar_association_threshold: f64,

    /// IQR multiplier for outlier fences.
    /// Default: 1.5
    pub outlier_iqr_multiplier: f64,

    /// Outlier ratio above which capping is suggested.
    /// Default: 0.05
    pub outlier_cap_threshold: f64,

    /// Absolute skewness at which the median is preferred over the mean.
    /// Default: 1.0
    pub skewness_threshold: f64,

    /// Rows needed before missingness mechanism tests are run.
    /// Default: 10
    pub min_rows_for_mechanism: usize,

    /// Present values below which confidence is reduced.
    /// Default: 30
    pub min_sample_size: usize,

    /// Treat textual markers such as "N/A" or "null" as missing.
    /// Default: true
    pub treat_markers_as_missing: bool,

    /// Skip metadata columns absent from the data instead of failing.
    /// Default: false
    pub skip_missing_columns: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            low_missing_threshold: 0.05,
            moderate_missing_threshold: 0.30,
            high_missing_threshold: 0.50,
            categorical_mode_threshold: 0.10,
            mar_association_threshold: 0.30,
            outlier_iqr_multiplier: 1.5,
            outlier_cap_threshold: 0.05,
            skewness_threshold: 1.0,
            min_rows_for_mechanism: 10,
            min_sample_size: 30,
            treat_markers_as_missing: true,
            skip_missing_columns: false,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults; the result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImputeError::FileNotFound {
                kind: InputKind::Config,
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        let ratios = [
            ("low_missing_threshold", self.low_missing_threshold),
            ("moderate_missing_threshold", self.moderate_missing_threshold),
            ("high_missing_threshold", self.high_missing_threshold),
            ("categorical_mode_threshold", self.categorical_mode_threshold),
            ("mar_association_threshold", self.mar_association_threshold),
            ("outlier_cap_threshold", self.outlier_cap_threshold),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.low_missing_threshold > self.moderate_missing_threshold
            || self.moderate_missing_threshold > self.high_missing_threshold
        {
            return Err(ConfigValidationError::UnorderedThresholds {
                low: self.low_missing_threshold,
                moderate: self.moderate_missing_threshold,
                high: self.high_missing_threshold,
            });
        }

        if !(self.outlier_iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidMultiplier(
                self.outlier_iqr_multiplier,
            ));
        }

        if !(self.skewness_threshold > 0.0) {
            return Err(ConfigValidationError::InvalidSkewness(
                self.skewness_threshold,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error(
        "Missing thresholds must be ordered low <= moderate <= high (got {low}, {moderate}, {high})"
    )]
    UnorderedThresholds { low: f64, moderate: f64, high: f64 },

    #[error("Invalid IQR multiplier: {0} (must be positive)")]
    InvalidMultiplier(f64),

    #[error("Invalid skewness threshold: {0} (must be positive)")]
    InvalidSkewness(f64),
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    low_missing_threshold: Option<f64>,
    moderate_missing_threshold: Option<f64>,
    high_missing_threshold: Option<f64>,
    categorical_mode_threshold: Option<f64>,
    mar_association_threshold: Option<f64>,
    outlier_iqr_multiplier: Option<f64>,
    outlier_cap_threshold: Option<f64>,
    skewness_threshold: Option<f64>,
    min_rows_for_mechanism: Option<usize>,
    min_sample_size: Option<usize>,
    treat_markers_as_missing: Option<bool>,
    skip_missing_columns: Option<bool>,
}

impl AnalysisConfigBuilder {
    /// Set the ratio up to which mean/median imputation is suggested.
    pub fn low_missing_threshold(mut self, threshold: f64) -> Self {
        self.low_missing_threshold = Some(threshold);
        self
    }

    /// Set the ratio up to which KNN imputation is suggested.
    pub fn moderate_missing_threshold(mut self, threshold: f64) -> Self {
        self.moderate_missing_threshold = Some(threshold);
        self
    }

    /// Set the ratio above which manual backfill is suggested.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.5 = 50%)
    pub fn high_missing_threshold(mut self, threshold: f64) -> Self {
        self.high_missing_threshold = Some(threshold);
        self
    }

    pub fn categorical_mode_threshold(mut self, threshold: f64) -> Self {
        self.categorical_mode_threshold = Some(threshold);
        self
    }

    /// Set the association strength needed to call missingness MAR.
    pub fn mar_association_threshold(mut self, threshold: f64) -> Self {
        self.mar_association_threshold = Some(threshold);
        self
    }

    pub fn outlier_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.outlier_iqr_multiplier = Some(multiplier);
        self
    }

    pub fn outlier_cap_threshold(mut self, threshold: f64) -> Self {
        self.outlier_cap_threshold = Some(threshold);
        self
    }

    pub fn skewness_threshold(mut self, threshold: f64) -> Self {
        self.skewness_threshold = Some(threshold);
        self
    }

    /// Set how many rows are needed before mechanism tests run.
    pub fn min_rows_for_mechanism(mut self, rows: usize) -> Self {
        self.min_rows_for_mechanism = Some(rows);
        self
    }

    pub fn min_sample_size(mut self, size: usize) -> Self {
        self.min_sample_size = Some(size);
        self
    }

    /// Enable or disable treating "N/A"-style markers as missing.
    pub fn treat_markers_as_missing(mut self, enable: bool) -> Self {
        self.treat_markers_as_missing = Some(enable);
        self
    }

    /// Skip metadata columns that are absent from the data.
    ///
    /// When false (the default), such columns fail the analysis.
    pub fn skip_missing_columns(mut self, skip: bool) -> Self {
        self.skip_missing_columns = Some(skip);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            low_missing_threshold: self
                .low_missing_threshold
                .unwrap_or(defaults.low_missing_threshold),
            moderate_missing_threshold: self
                .moderate_missing_threshold
                .unwrap_or(defaults.moderate_missing_threshold),
            high_missing_threshold: self
                .high_missing_threshold
                .unwrap_or(defaults.high_missing_threshold),
            categorical_mode_threshold: self
                .categorical_mode_threshold
                .unwrap_or(defaults.categorical_mode_threshold),
            mar_association_threshold: self
                .mar_association_threshold
                .unwrap_or(defaults.mar_association_threshold),
            outlier_iqr_multiplier: self
                .outlier_iqr_multiplier
                .unwrap_or(defaults.outlier_iqr_multiplier),
            outlier_cap_threshold: self
                .outlier_cap_threshold
                .unwrap_or(defaults.outlier_cap_threshold),
            skewness_threshold: self
                .skewness_threshold
                .unwrap_or(defaults.skewness_threshold),
            min_rows_for_mechanism: self
                .min_rows_for_mechanism
                .unwrap_or(defaults.min_rows_for_mechanism),
            min_sample_size: self.min_sample_size.unwrap_or(defaults.min_sample_size),
            treat_markers_as_missing: self
                .treat_markers_as_missing
                .unwrap_or(defaults.treat_markers_as_missing),
            skip_missing_columns: self
                .skip_missing_columns
                .unwrap_or(defaults.skip_missing_columns),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.low_missing_threshold, 0.05);
        assert_eq!(config.high_missing_threshold, 0.5);
        assert_eq!(config.min_rows_for_mechanism, 10);
        assert!(config.treat_markers_as_missing);
        assert!(!config.skip_missing_columns);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .high_missing_threshold(0.7)
            .mar_association_threshold(0.2)
            .min_sample_size(50)
            .skip_missing_columns(true)
            .build()
            .unwrap();

        assert_eq!(config.high_missing_threshold, 0.7);
        assert_eq!(config.mar_association_threshold, 0.2);
        assert_eq!(config.min_sample_size, 50);
        assert!(config.skip_missing_columns);
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = AnalysisConfig::builder().outlier_cap_threshold(1.5).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_unordered_thresholds() {
        let result = AnalysisConfig::builder()
            .low_missing_threshold(0.4)
            .moderate_missing_threshold(0.3)
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::UnorderedThresholds { .. }
        ));
    }

    #[test]
    fn test_validation_rejects_non_positive_multiplier() {
        let result = AnalysisConfig::builder().outlier_iqr_multiplier(0.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier(_)
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "high_missing_threshold": 0.6, "skip_missing_columns": true }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.high_missing_threshold, 0.6);
        assert!(config.skip_missing_columns);
        assert_eq!(config.low_missing_threshold, 0.05);
        assert_eq!(config.outlier_iqr_multiplier, 1.5);
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = AnalysisConfig::from_json_file("does/not/exist.json").unwrap_err();
        assert!(err.is_file_not_found());
        assert_eq!(err.missing_input(), Some(InputKind::Config));
    }
}
