use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ImputeError;

// ============================================================================
// Column metadata (input)
// ============================================================================

/// Declared semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Categorical,
    Boolean,
    Datetime,
}

impl ColumnType {
    /// Integer and float columns are analysed numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Categorical => "categorical",
            ColumnType::Boolean => "boolean",
            ColumnType::Datetime => "datetime",
        }
    }

    /// Parse a declared type, accepting common aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "bigint" | "int64" => Some(ColumnType::Integer),
            "float" | "double" | "decimal" | "numeric" | "real" | "float64" => {
                Some(ColumnType::Float)
            }
            "string" | "str" | "text" | "varchar" => Some(ColumnType::String),
            "categorical" | "category" | "enum" => Some(ColumnType::Categorical),
            "boolean" | "bool" => Some(ColumnType::Boolean),
            "datetime" | "date" | "timestamp" => Some(ColumnType::Datetime),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type and constraints for one data column.
///
/// Records are plain values: build them with [`ColumnMetadata::new`] and the
/// `with_*` methods, then hand a slice of them to the analyzer.
///
/// # Example
///
/// ```rust,ignore
/// use funimpute::{ColumnMetadata, ColumnType};
///
/// let age = ColumnMetadata::new("age", ColumnType::Integer)
///     .with_min_value(0.0)
///     .with_max_value(120.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub column_name: String,
    pub data_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub unique_flag: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column whose value this one is derived from or tied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_column: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
    /// Free-text business rule; column names mentioned here become predictors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_rule: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnMetadata {
    pub fn new(column_name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            column_name: column_name.into(),
            data_type,
            min_value: None,
            max_value: None,
            max_length: None,
            unique_flag: false,
            nullable: true,
            description: None,
            dependent_column: None,
            allowed_values: Vec::new(),
            business_rule: None,
        }
    }

    /// Create metadata from a textual type name (`"integer"`, `"float"`, ...).
    pub fn from_type_name(
        column_name: impl Into<String>,
        type_name: &str,
    ) -> Result<Self, ImputeError> {
        let column_name = column_name.into();
        let data_type =
            ColumnType::parse(type_name).ok_or_else(|| ImputeError::UnknownColumnType {
                column: column_name.clone(),
                value: type_name.to_string(),
            })?;
        Ok(Self::new(column_name, data_type))
    }

    pub fn with_min_value(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn with_max_value(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    pub fn with_max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn with_unique_flag(mut self, unique: bool) -> Self {
        self.unique_flag = unique;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dependent_column(mut self, column: impl Into<String>) -> Self {
        self.dependent_column = Some(column.into());
        self
    }

    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_business_rule(mut self, rule: impl Into<String>) -> Self {
        self.business_rule = Some(rule.into());
        self
    }

    /// Whether min/max bounds were declared.
    pub fn has_bounds(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some()
    }
}

// ============================================================================
// Suggestion (output)
// ============================================================================

/// How the missing values of a column came to be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingnessMechanism {
    /// The column has no missing values.
    NoMissing,
    /// Missing completely at random: no association with other columns.
    Mcar,
    /// Missing at random: missingness is explained by other columns.
    Mar,
    /// Too little data to test.
    Undetermined,
}

impl MissingnessMechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingnessMechanism::NoMissing => "no_missing",
            MissingnessMechanism::Mcar => "mcar",
            MissingnessMechanism::Mar => "mar",
            MissingnessMechanism::Undetermined => "undetermined",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MissingnessMechanism::NoMissing => "no missing values",
            MissingnessMechanism::Mcar => "MCAR",
            MissingnessMechanism::Mar => "MAR",
            MissingnessMechanism::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for MissingnessMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Proposed imputation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    NoImputation,
    Mean,
    Median,
    Mode,
    Knn,
    Regression,
    ForwardFill,
    /// Fill with an explicit "Unknown" category.
    Constant,
    BusinessRule,
    /// Values must be recovered from the source system.
    ManualBackfill,
}

impl ImputationMethod {
    /// Stable snake_case label used in reports and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImputationMethod::NoImputation => "no_imputation",
            ImputationMethod::Mean => "mean",
            ImputationMethod::Median => "median",
            ImputationMethod::Mode => "mode",
            ImputationMethod::Knn => "knn",
            ImputationMethod::Regression => "regression",
            ImputationMethod::ForwardFill => "forward_fill",
            ImputationMethod::Constant => "constant",
            ImputationMethod::BusinessRule => "business_rule",
            ImputationMethod::ManualBackfill => "manual_backfill",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ImputationMethod::NoImputation => "No Imputation",
            ImputationMethod::Mean => "Mean",
            ImputationMethod::Median => "Median",
            ImputationMethod::Mode => "Mode",
            ImputationMethod::Knn => "KNN",
            ImputationMethod::Regression => "Regression",
            ImputationMethod::ForwardFill => "Forward Fill",
            ImputationMethod::Constant => "Constant",
            ImputationMethod::BusinessRule => "Business Rule",
            ImputationMethod::ManualBackfill => "Manual Backfill",
        }
    }
}

impl fmt::Display for ImputationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImputationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.trim().to_ascii_lowercase().as_str() {
            "no_imputation" => ImputationMethod::NoImputation,
            "mean" => ImputationMethod::Mean,
            "median" => ImputationMethod::Median,
            "mode" => ImputationMethod::Mode,
            "knn" => ImputationMethod::Knn,
            "regression" => ImputationMethod::Regression,
            "forward_fill" => ImputationMethod::ForwardFill,
            "constant" => ImputationMethod::Constant,
            "business_rule" => ImputationMethod::BusinessRule,
            "manual_backfill" => ImputationMethod::ManualBackfill,
            other => return Err(format!("unknown imputation method '{}'", other)),
        };
        Ok(method)
    }
}

/// What to do with outliers in a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierHandling {
    /// Nothing to handle.
    NoAction,
    /// Leave the few outliers in place.
    Keep,
    /// Cap values at the declared bounds or IQR fences.
    Cap,
}

impl OutlierHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutlierHandling::NoAction => "no_action",
            OutlierHandling::Keep => "keep",
            OutlierHandling::Cap => "cap",
        }
    }
}

/// Imputation suggestion for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationSuggestion {
    pub column_name: String,
    pub missing_count: usize,
    /// Percentage of missing rows (0 - 100).
    pub missing_percentage: f64,
    pub mechanism: MissingnessMechanism,
    /// Columns used as predictors or explaining the missingness.
    #[serde(default)]
    pub related_columns: Vec<String>,
    pub proposed_method: ImputationMethod,
    pub rationale: String,
    pub outlier_count: usize,
    pub outlier_percentage: f64,
    pub outlier_handling: OutlierHandling,
    pub outlier_rationale: String,
    pub constraint_violations: usize,
    /// Confidence in the proposed method (0.0 - 1.0).
    pub confidence_score: f64,
}

impl ImputationSuggestion {
    /// Whether any values are missing in this column.
    pub fn needs_imputation(&self) -> bool {
        self.missing_count > 0
    }
}
