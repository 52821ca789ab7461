//! Rule-based decision engine using heuristics.

use super::{ColumnContext, DecisionEngine};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::types::{
    ColumnType, ImputationMethod, ImputationSuggestion, MissingnessMechanism, OutlierHandling,
};
use crate::utils::round3;
use tracing::debug;

/// Method chosen for a column, before confidence adjustments.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MethodChoice {
    pub method: ImputationMethod,
    pub base_confidence: f64,
    pub reason: String,
}

impl MethodChoice {
    fn new(method: ImputationMethod, base_confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            method,
            base_confidence,
            reason: reason.into(),
        }
    }
}

/// Rule-based decision maker.
///
/// Rules are evaluated in order and the first match wins. Structural rules
/// come first, then type-specific ones.
pub struct RuleBasedDecisionEngine {
    config: AnalysisConfig,
}

impl RuleBasedDecisionEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Pick the imputation method for a column with missing values.
    pub(crate) fn select_method(&self, ctx: &ColumnContext<'_>) -> MethodChoice {
        let meta = ctx.metadata;
        let profile = ctx.profile;
        let ratio = profile.missing_ratio;

        if profile.missing_count == 0 {
            return MethodChoice::new(
                ImputationMethod::NoImputation,
                1.0,
                "No missing values; no imputation needed",
            );
        }
        if profile.present_count == 0 {
            return MethodChoice::new(
                ImputationMethod::ManualBackfill,
                0.9,
                "Every value is missing, so there is nothing to learn from",
            );
        }
        if meta.unique_flag {
            return MethodChoice::new(
                ImputationMethod::ManualBackfill,
                0.9,
                "Column is declared unique; unique values cannot be synthesized",
            );
        }
        if ratio > self.config.high_missing_threshold {
            return MethodChoice::new(
                ImputationMethod::ManualBackfill,
                0.6,
                format!(
                    "More than {:.0}% of values are missing; imputing would invent most of the column",
                    self.config.high_missing_threshold * 100.0
                ),
            );
        }

        match meta.data_type {
            ColumnType::Integer | ColumnType::Float => self.select_numeric(ctx),
            ColumnType::Datetime => MethodChoice::new(
                ImputationMethod::ForwardFill,
                0.7,
                "Temporal column; carry the previous observation forward",
            ),
            ColumnType::String | ColumnType::Categorical | ColumnType::Boolean => {
                self.select_categorical(ctx)
            }
        }
    }

    fn select_numeric(&self, ctx: &ColumnContext<'_>) -> MethodChoice {
        let profile = ctx.profile;
        let ratio = profile.missing_ratio;

        if ctx.has_numeric_predictor() {
            return MethodChoice::new(
                ImputationMethod::Regression,
                0.8,
                format!(
                    "Numeric column with related numeric predictors ({})",
                    ctx.predictor_names().join(", ")
                ),
            );
        }
        if !ctx.predictors.is_empty() {
            return MethodChoice::new(
                ImputationMethod::Knn,
                0.75,
                format!(
                    "Numeric column related to categorical columns ({}); use nearest neighbours",
                    ctx.predictor_names().join(", ")
                ),
            );
        }
        if ctx.metadata.business_rule.is_some() {
            return MethodChoice::new(
                ImputationMethod::BusinessRule,
                0.7,
                "Business rule declared for this column; derive values from it",
            );
        }
        if ratio <= self.config.low_missing_threshold {
            let skewed = profile.is_skewed(self.config.skewness_threshold);
            if skewed || profile.outlier_count > 0 {
                return MethodChoice::new(
                    ImputationMethod::Median,
                    0.9,
                    "Few values missing; distribution is skewed or has outliers, so the median is robust",
                );
            }
            return MethodChoice::new(
                ImputationMethod::Mean,
                0.9,
                "Few values missing and the distribution is roughly symmetric",
            );
        }
        if ratio <= self.config.moderate_missing_threshold && ctx.has_other_numeric {
            return MethodChoice::new(
                ImputationMethod::Knn,
                0.75,
                "Moderate share missing; neighbours in the other numeric columns give better estimates",
            );
        }
        MethodChoice::new(
            ImputationMethod::Median,
            0.7,
            "No usable predictors; the median is the safest central value",
        )
    }

    fn select_categorical(&self, ctx: &ColumnContext<'_>) -> MethodChoice {
        let meta = ctx.metadata;
        let ratio = ctx.profile.missing_ratio;

        if meta.business_rule.is_some() {
            return MethodChoice::new(
                ImputationMethod::BusinessRule,
                0.7,
                "Business rule declared for this column; derive values from it",
            );
        }
        if meta.data_type != ColumnType::Boolean && !ctx.predictors.is_empty() {
            return MethodChoice::new(
                ImputationMethod::Knn,
                0.7,
                format!(
                    "Categories depend on related columns ({}); use nearest neighbours",
                    ctx.predictor_names().join(", ")
                ),
            );
        }
        if meta.data_type == ColumnType::Boolean
            || !meta.allowed_values.is_empty()
            || ratio <= self.config.categorical_mode_threshold
        {
            let mode = ctx
                .profile
                .mode
                .as_deref()
                .map(|m| format!(" ('{}')", m))
                .unwrap_or_default();
            return MethodChoice::new(
                ImputationMethod::Mode,
                0.85,
                format!("Fill with the most frequent value{}", mode),
            );
        }
        MethodChoice::new(
            ImputationMethod::Constant,
            0.75,
            "Too many values missing for the mode; add an explicit 'Unknown' category",
        )
    }

    /// Adjust the base confidence for sparsity, sample size and data quality.
    pub(crate) fn score_confidence(&self, choice: &MethodChoice, ctx: &ColumnContext<'_>) -> f64 {
        if choice.method == ImputationMethod::NoImputation {
            return round3(choice.base_confidence.clamp(0.0, 1.0));
        }

        let profile = ctx.profile;
        let mut confidence = choice.base_confidence * (1.0 - 0.5 * profile.missing_ratio);
        if profile.present_count < self.config.min_sample_size {
            confidence *= 0.9;
        }
        if ctx.mechanism.mechanism == MissingnessMechanism::Undetermined {
            confidence *= 0.9;
        }
        if profile.constraint_violations > 0 {
            confidence *= 0.95;
        }
        round3(confidence.clamp(0.0, 1.0))
    }

    /// Decide what to do about outliers in a numeric column.
    pub(crate) fn assess_outliers(&self, ctx: &ColumnContext<'_>) -> (OutlierHandling, String) {
        let profile = ctx.profile;
        if !profile.column_type.is_numeric() {
            return (OutlierHandling::NoAction, "Not a numeric column".to_string());
        }
        if profile.outlier_count == 0 && profile.bound_violations == 0 {
            return (OutlierHandling::NoAction, "No outliers detected".to_string());
        }
        if ctx.metadata.has_bounds() && profile.bound_violations > 0 {
            return (
                OutlierHandling::Cap,
                format!(
                    "{} value(s) outside the declared range; cap to the declared bounds",
                    profile.bound_violations
                ),
            );
        }
        if profile.outlier_ratio() > self.config.outlier_cap_threshold {
            return (
                OutlierHandling::Cap,
                format!(
                    "{} outlier(s) ({:.1}%) beyond the IQR fences; cap to the fences",
                    profile.outlier_count,
                    profile.outlier_ratio() * 100.0
                ),
            );
        }
        (
            OutlierHandling::Keep,
            format!(
                "{} isolated outlier(s); keep them as plausible extremes",
                profile.outlier_count
            ),
        )
    }

    fn build_rationale(&self, choice: &MethodChoice, ctx: &ColumnContext<'_>) -> String {
        let profile = ctx.profile;
        if profile.missing_count == 0 {
            return format!("{}.", choice.reason);
        }

        let mut parts = vec![
            format!("{}.", choice.reason),
            format!(
                "{:.1}% missing ({} of {} rows).",
                profile.missing_percentage(),
                profile.missing_count,
                profile.total_rows
            ),
        ];

        let mechanism = ctx.mechanism;
        if mechanism.related.is_empty() {
            parts.push(format!("Mechanism: {}.", mechanism.mechanism));
        } else {
            parts.push(format!(
                "Mechanism: {} (associated with {}).",
                mechanism.mechanism,
                mechanism.related_names().join(", ")
            ));
        }
        if !ctx.metadata.nullable {
            parts.push("Column is declared non-nullable.".to_string());
        }
        if profile.constraint_violations > 0 {
            parts.push(format!(
                "{} value(s) violate declared constraints.",
                profile.constraint_violations
            ));
        }
        parts.join(" ")
    }
}

impl DecisionEngine for RuleBasedDecisionEngine {
    fn suggest(&self, ctx: &ColumnContext<'_>) -> Result<ImputationSuggestion> {
        let choice = self.select_method(ctx);
        let confidence_score = self.score_confidence(&choice, ctx);
        let (outlier_handling, outlier_rationale) = self.assess_outliers(ctx);
        let rationale = self.build_rationale(&choice, ctx);
        let profile = ctx.profile;

        debug!(
            "Rule-based decision for {}: {} ({:.3})",
            profile.name,
            choice.method.as_str(),
            confidence_score
        );

        let related_columns = if ctx.predictors.is_empty() {
            ctx.mechanism.related_names()
        } else {
            ctx.predictor_names()
        };

        Ok(ImputationSuggestion {
            column_name: profile.name.clone(),
            missing_count: profile.missing_count,
            missing_percentage: round3(profile.missing_percentage()),
            mechanism: ctx.mechanism.mechanism,
            related_columns,
            proposed_method: choice.method,
            rationale,
            outlier_count: profile.outlier_count,
            outlier_percentage: round3(profile.outlier_ratio() * 100.0),
            outlier_handling,
            outlier_rationale,
            constraint_violations: profile.constraint_violations,
            confidence_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decisions::{Predictor, PredictorSource};
    use crate::profiler::{ColumnProfile, MechanismAssessment, NumericSummary};
    use crate::types::ColumnMetadata;

    /// Helper to create a ColumnProfile for testing
    fn create_profile(
        name: &str,
        column_type: ColumnType,
        total_rows: usize,
        missing_count: usize,
    ) -> ColumnProfile {
        let present_count = total_rows - missing_count;
        ColumnProfile {
            name: name.to_string(),
            column_type,
            total_rows,
            missing_count,
            missing_ratio: missing_count as f64 / total_rows as f64,
            present_count,
            unique_count: present_count,
            numeric: column_type.is_numeric().then(|| NumericSummary {
                count: present_count,
                mean: 10.0,
                median: 10.0,
                std: 1.0,
                skewness: 0.0,
                min: 8.0,
                max: 12.0,
                q1: 9.0,
                q3: 11.0,
            }),
            outlier_count: 0,
            bound_violations: 0,
            constraint_violations: 0,
            mode: Some("A".to_string()),
        }
    }

    fn mechanism(kind: MissingnessMechanism) -> MechanismAssessment {
        MechanismAssessment {
            mechanism: kind,
            related: Vec::new(),
        }
    }

    fn predictor(name: &str, is_numeric: bool) -> Predictor {
        Predictor {
            name: name.to_string(),
            is_numeric,
            source: PredictorSource::BusinessRule,
        }
    }

    fn context<'a>(
        meta: &'a ColumnMetadata,
        profile: &'a ColumnProfile,
        mechanism: &'a MechanismAssessment,
        predictors: Vec<Predictor>,
        has_other_numeric: bool,
    ) -> ColumnContext<'a> {
        ColumnContext {
            metadata: meta,
            profile,
            mechanism,
            predictors,
            has_other_numeric,
        }
    }

    fn engine() -> RuleBasedDecisionEngine {
        RuleBasedDecisionEngine::new(AnalysisConfig::default())
    }

    // ==================== select_method tests ====================

    #[test]
    fn test_no_missing_values_needs_no_imputation() {
        let meta = ColumnMetadata::new("age", ColumnType::Integer);
        let profile = create_profile("age", ColumnType::Integer, 100, 0);
        let mech = mechanism(MissingnessMechanism::NoMissing);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        let suggestion = engine().suggest(&ctx).unwrap();
        assert_eq!(suggestion.proposed_method, ImputationMethod::NoImputation);
        assert_eq!(suggestion.confidence_score, 1.0);
        assert_eq!(suggestion.missing_count, 0);
    }

    #[test]
    fn test_all_missing_needs_backfill() {
        let meta = ColumnMetadata::new("notes", ColumnType::String);
        let profile = create_profile("notes", ColumnType::String, 10, 10);
        let mech = mechanism(MissingnessMechanism::Undetermined);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        assert_eq!(
            engine().select_method(&ctx).method,
            ImputationMethod::ManualBackfill
        );
    }

    #[test]
    fn test_unique_column_needs_backfill() {
        let meta = ColumnMetadata::new("user_id", ColumnType::Integer).with_unique_flag(true);
        let profile = create_profile("user_id", ColumnType::Integer, 100, 2);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![predictor("age", true)], true);

        assert_eq!(
            engine().select_method(&ctx).method,
            ImputationMethod::ManualBackfill
        );
    }

    #[test]
    fn test_high_missing_needs_backfill() {
        let meta = ColumnMetadata::new("income", ColumnType::Float);
        let profile = create_profile("income", ColumnType::Float, 100, 60);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], true);

        let choice = engine().select_method(&ctx);
        assert_eq!(choice.method, ImputationMethod::ManualBackfill);
        assert_eq!(choice.base_confidence, 0.6);
    }

    #[test]
    fn test_numeric_predictor_uses_regression() {
        let meta = ColumnMetadata::new("income", ColumnType::Float)
            .with_business_rule("Correlates with age");
        let profile = create_profile("income", ColumnType::Float, 100, 20);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![predictor("age", true)], true);

        assert_eq!(
            engine().select_method(&ctx).method,
            ImputationMethod::Regression
        );
    }

    #[test]
    fn test_categorical_predictor_uses_knn_for_numeric() {
        let meta = ColumnMetadata::new("income", ColumnType::Float);
        let profile = create_profile("income", ColumnType::Float, 100, 20);
        let mech = mechanism(MissingnessMechanism::Mar);
        let ctx = context(&meta, &profile, &mech, vec![predictor("region", false)], false);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Knn);
    }

    #[test]
    fn test_numeric_business_rule_without_references() {
        let meta = ColumnMetadata::new("discount", ColumnType::Float)
            .with_business_rule("Zero unless a promotion is active");
        let profile = create_profile("discount", ColumnType::Float, 100, 20);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], true);

        assert_eq!(
            engine().select_method(&ctx).method,
            ImputationMethod::BusinessRule
        );
    }

    #[test]
    fn test_low_missing_symmetric_uses_mean() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let profile = create_profile("value", ColumnType::Float, 100, 3);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Mean);
    }

    #[test]
    fn test_low_missing_skewed_uses_median() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let mut profile = create_profile("value", ColumnType::Float, 100, 3);
        if let Some(summary) = profile.numeric.as_mut() {
            summary.skewness = 2.5;
        }
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Median);
    }

    #[test]
    fn test_low_missing_with_outliers_uses_median() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let mut profile = create_profile("value", ColumnType::Float, 100, 3);
        profile.outlier_count = 2;
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Median);
    }

    #[test]
    fn test_moderate_missing_uses_knn_with_other_numeric() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let profile = create_profile("value", ColumnType::Float, 100, 15);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], true);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Knn);
    }

    #[test]
    fn test_moderate_missing_alone_uses_median() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let profile = create_profile("value", ColumnType::Float, 100, 15);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        let choice = engine().select_method(&ctx);
        assert_eq!(choice.method, ImputationMethod::Median);
        assert_eq!(choice.base_confidence, 0.7);
    }

    #[test]
    fn test_datetime_uses_forward_fill() {
        let meta = ColumnMetadata::new("signup_date", ColumnType::Datetime);
        let profile = create_profile("signup_date", ColumnType::Datetime, 100, 10);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], true);

        assert_eq!(
            engine().select_method(&ctx).method,
            ImputationMethod::ForwardFill
        );
    }

    #[test]
    fn test_categorical_low_missing_uses_mode() {
        let meta = ColumnMetadata::new("category", ColumnType::Categorical);
        let profile = create_profile("category", ColumnType::Categorical, 100, 5);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], true);

        let choice = engine().select_method(&ctx);
        assert_eq!(choice.method, ImputationMethod::Mode);
        assert!(choice.reason.contains("'A'"));
    }

    #[test]
    fn test_categorical_high_missing_uses_constant() {
        let meta = ColumnMetadata::new("category", ColumnType::Categorical);
        let profile = create_profile("category", ColumnType::Categorical, 100, 25);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], true);

        assert_eq!(
            engine().select_method(&ctx).method,
            ImputationMethod::Constant
        );
    }

    #[test]
    fn test_categorical_allowed_values_keep_mode() {
        let meta = ColumnMetadata::new("category", ColumnType::Categorical)
            .with_allowed_values(["A", "B", "C"]);
        let profile = create_profile("category", ColumnType::Categorical, 100, 25);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], true);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Mode);
    }

    #[test]
    fn test_categorical_with_predictors_uses_knn() {
        let meta = ColumnMetadata::new("category", ColumnType::Categorical);
        let profile = create_profile("category", ColumnType::Categorical, 100, 25);
        let mech = mechanism(MissingnessMechanism::Mar);
        let ctx = context(&meta, &profile, &mech, vec![predictor("age", true)], true);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Knn);
    }

    #[test]
    fn test_boolean_uses_mode_even_with_predictors() {
        let meta = ColumnMetadata::new("active", ColumnType::Boolean);
        let profile = create_profile("active", ColumnType::Boolean, 100, 25);
        let mech = mechanism(MissingnessMechanism::Mar);
        let ctx = context(&meta, &profile, &mech, vec![predictor("age", true)], true);

        assert_eq!(engine().select_method(&ctx).method, ImputationMethod::Mode);
    }

    // ==================== score_confidence tests ====================

    #[test]
    fn test_confidence_penalizes_missing_ratio() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let profile = create_profile("value", ColumnType::Float, 100, 20);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![predictor("age", true)], true);

        let engine = engine();
        let choice = engine.select_method(&ctx);
        // 0.8 * (1 - 0.5 * 0.2)
        assert_eq!(engine.score_confidence(&choice, &ctx), 0.72);
    }

    #[test]
    fn test_confidence_small_sample_and_undetermined() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let profile = create_profile("value", ColumnType::Float, 5, 2);
        let mech = mechanism(MissingnessMechanism::Undetermined);
        let ctx = context(&meta, &profile, &mech, vec![predictor("age", true)], true);

        let engine = engine();
        let choice = engine.select_method(&ctx);
        // 0.8 * (1 - 0.5 * 0.4) * 0.9 * 0.9
        assert_eq!(engine.score_confidence(&choice, &ctx), 0.518);
    }

    #[test]
    fn test_confidence_constraint_penalty() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let mut profile = create_profile("value", ColumnType::Float, 100, 20);
        profile.constraint_violations = 3;
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![predictor("age", true)], true);

        let engine = engine();
        let choice = engine.select_method(&ctx);
        // 0.72 * 0.95
        assert_eq!(engine.score_confidence(&choice, &ctx), 0.684);
    }

    // ==================== assess_outliers tests ====================

    #[test]
    fn test_outliers_none() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let profile = create_profile("value", ColumnType::Float, 100, 0);
        let mech = mechanism(MissingnessMechanism::NoMissing);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        assert_eq!(engine().assess_outliers(&ctx).0, OutlierHandling::NoAction);
    }

    #[test]
    fn test_outliers_bound_violations_cap() {
        let meta = ColumnMetadata::new("age", ColumnType::Integer).with_max_value(120.0);
        let mut profile = create_profile("age", ColumnType::Integer, 100, 0);
        profile.bound_violations = 1;
        let mech = mechanism(MissingnessMechanism::NoMissing);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        let (handling, rationale) = engine().assess_outliers(&ctx);
        assert_eq!(handling, OutlierHandling::Cap);
        assert!(rationale.contains("declared"));
    }

    #[test]
    fn test_outliers_many_cap_few_keep() {
        let meta = ColumnMetadata::new("value", ColumnType::Float);
        let mech = mechanism(MissingnessMechanism::NoMissing);

        let mut many = create_profile("value", ColumnType::Float, 100, 0);
        many.outlier_count = 10;
        let ctx = context(&meta, &many, &mech, vec![], false);
        assert_eq!(engine().assess_outliers(&ctx).0, OutlierHandling::Cap);

        let mut few = create_profile("value", ColumnType::Float, 100, 0);
        few.outlier_count = 2;
        let ctx = context(&meta, &few, &mech, vec![], false);
        assert_eq!(engine().assess_outliers(&ctx).0, OutlierHandling::Keep);
    }

    #[test]
    fn test_outliers_not_numeric() {
        let meta = ColumnMetadata::new("category", ColumnType::Categorical);
        let profile = create_profile("category", ColumnType::Categorical, 100, 0);
        let mech = mechanism(MissingnessMechanism::NoMissing);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        assert_eq!(engine().assess_outliers(&ctx).0, OutlierHandling::NoAction);
    }

    // ==================== suggest tests ====================

    #[test]
    fn test_suggest_rationale_mentions_non_nullable() {
        let meta = ColumnMetadata::new("category", ColumnType::Categorical).with_nullable(false);
        let profile = create_profile("category", ColumnType::Categorical, 100, 5);
        let mech = mechanism(MissingnessMechanism::Mcar);
        let ctx = context(&meta, &profile, &mech, vec![], false);

        let suggestion = engine().suggest(&ctx).unwrap();
        assert!(suggestion.rationale.contains("non-nullable"));
        assert!(suggestion.rationale.contains("5.0% missing"));
        assert_eq!(suggestion.missing_percentage, 5.0);
    }

    #[test]
    fn test_suggest_reports_related_columns() {
        let meta = ColumnMetadata::new("income", ColumnType::Float);
        let profile = create_profile("income", ColumnType::Float, 100, 20);
        let mech = MechanismAssessment {
            mechanism: MissingnessMechanism::Mar,
            related: vec![("region".to_string(), 0.9)],
        };
        let ctx = context(&meta, &profile, &mech, vec![predictor("region", false)], false);

        let suggestion = engine().suggest(&ctx).unwrap();
        assert_eq!(suggestion.related_columns, vec!["region".to_string()]);
        assert_eq!(suggestion.mechanism, MissingnessMechanism::Mar);
        assert!(suggestion.rationale.contains("associated with region"));
    }
}
