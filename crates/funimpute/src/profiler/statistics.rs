//! Statistical summaries for numeric columns.

use serde::{Deserialize, Serialize};

/// Summary statistics over the present values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation.
    pub std: f64,
    pub skewness: f64,
    pub min: f64,
    pub max: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
}

impl NumericSummary {
    /// Summarize a slice of values. Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let (q1, q3) = quartiles(&sorted);
        Some(Self {
            count: values.len(),
            mean: calculate_mean(values),
            median: median_of_sorted(&sorted),
            std: calculate_std(values),
            skewness: calculate_skewness(values),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q1,
            q3,
        })
    }

    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lower and upper IQR fences.
    pub fn fences(&self, multiplier: f64) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - multiplier * iqr, self.q3 + multiplier * iqr)
    }
}

pub(crate) fn calculate_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the sample standard deviation.
pub(crate) fn calculate_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }

    let mean = calculate_mean(values);
    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Calculate skewness as the mean cubed z-score.
pub(crate) fn calculate_skewness(values: &[f64]) -> f64 {
    let std = calculate_std(values);
    if std == 0.0 {
        return 0.0;
    }

    let mean = calculate_mean(values);
    let skew_sum: f64 = values.iter().map(|v| ((v - mean) / std).powi(3)).sum();
    skew_sum / values.len() as f64
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Quartiles by position in the sorted values.
fn quartiles(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len();
    let q1_idx = (n as f64 * 0.25) as usize;
    let q3_idx = ((n as f64 * 0.75) as usize).min(n - 1);
    (sorted[q1_idx], sorted[q3_idx])
}

/// Count values outside the IQR fences.
///
/// Fewer than 4 values never produce outliers.
pub(crate) fn count_iqr_outliers(values: &[f64], summary: &NumericSummary, multiplier: f64) -> usize {
    if values.len() < 4 {
        return 0;
    }
    let (lower, upper) = summary.fences(multiplier);
    values.iter().filter(|&&v| v < lower || v > upper).count()
}
