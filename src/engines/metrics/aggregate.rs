use super::classification::ClassificationMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coefficient of variation below which folds agree closely
pub const HIGH_ROBUSTNESS_CV: f64 = 0.1;
/// Coefficient of variation below which folds agree moderately
pub const MODERATE_ROBUSTNESS_CV: f64 = 0.2;

/// How consistent a metric is across walk-forward folds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Robustness {
    High,
    Moderate,
    Low,
}

impl Robustness {
    pub fn from_cv(cv: f64) -> Self {
        if cv < HIGH_ROBUSTNESS_CV {
            Self::High
        } else if cv < MODERATE_ROBUSTNESS_CV {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Robustness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    /// Sample standard deviation, 0 for a single value
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// `std / mean`; undefined when the mean is 0
    pub cv: Option<f64>,
    pub robustness: Option<Robustness>,
}

impl MetricSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let std = calculate_std(values, mean);
        let cv = if mean == 0.0 { None } else { Some(std / mean) };
        Some(Self {
            mean,
            std,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            cv,
            robustness: cv.map(Robustness::from_cv),
        })
    }
}

/// Mean ± std per metric over scored folds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub folds: usize,
    pub precision: MetricSummary,
    pub recall: MetricSummary,
    pub f1: MetricSummary,
    pub accuracy: MetricSummary,
}

impl AggregateMetrics {
    /// `None` when no fold was scored
    pub fn from_folds(folds: &[ClassificationMetrics]) -> Option<Self> {
        let summary = |metric: fn(&ClassificationMetrics) -> f64| {
            let values: Vec<f64> = folds.iter().map(metric).collect();
            MetricSummary::from_values(&values)
        };

        Some(Self {
            folds: folds.len(),
            precision: summary(|m| m.precision)?,
            recall: summary(|m| m.recall)?,
            f1: summary(|m| m.f1)?,
            accuracy: summary(|m| m.accuracy)?,
        })
    }

    /// Overall fold-to-fold consistency, graded on F1
    pub fn robustness(&self) -> Option<Robustness> {
        self.f1.robustness
    }
}

fn calculate_std(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::metrics::ConfusionMatrix;

    fn metrics(value: f64) -> ClassificationMetrics {
        ClassificationMetrics {
            precision: value,
            recall: value,
            f1: value,
            accuracy: value,
            support: 10,
            confusion: ConfusionMatrix::default(),
        }
    }

    #[test]
    fn test_summary_uses_sample_std() {
        let s = MetricSummary::from_values(&[0.5, 0.7, 0.9]).unwrap();
        assert!((s.mean - 0.7).abs() < 1e-12);
        assert!((s.std - 0.2).abs() < 1e-12);
        assert_eq!(s.min, 0.5);
        assert_eq!(s.max, 0.9);
    }

    #[test]
    fn test_single_fold_has_zero_std() {
        let agg = AggregateMetrics::from_folds(&[metrics(0.6)]).unwrap();
        assert_eq!(agg.folds, 1);
        assert_eq!(agg.f1.mean, 0.6);
        assert_eq!(agg.f1.std, 0.0);
    }

    #[test]
    fn test_coefficient_of_variation_grades() {
        // std 0.2 over mean 0.7
        let s = MetricSummary::from_values(&[0.5, 0.7, 0.9]).unwrap();
        assert!((s.cv.unwrap() - 0.2 / 0.7).abs() < 1e-12);
        assert_eq!(s.robustness, Some(Robustness::Low));

        let steady = MetricSummary::from_values(&[0.60, 0.62, 0.64]).unwrap();
        assert_eq!(steady.robustness, Some(Robustness::High));

        let middling = MetricSummary::from_values(&[0.5, 0.6, 0.7]).unwrap();
        assert_eq!(middling.robustness, Some(Robustness::Moderate));
    }

    #[test]
    fn test_cv_undefined_for_zero_mean() {
        let s = MetricSummary::from_values(&[0.0, 0.0]).unwrap();
        assert_eq!(s.std, 0.0);
        assert_eq!(s.cv, None);
        assert_eq!(s.robustness, None);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Robustness::from_cv(0.0), Robustness::High);
        assert_eq!(Robustness::from_cv(0.1), Robustness::Moderate);
        assert_eq!(Robustness::from_cv(0.199), Robustness::Moderate);
        assert_eq!(Robustness::from_cv(0.2), Robustness::Low);
    }

    #[test]
    fn test_overall_grade_follows_f1() {
        let mut folds = vec![metrics(0.6), metrics(0.6)];
        folds[1].f1 = 0.9;
        let agg = AggregateMetrics::from_folds(&folds).unwrap();
        assert_eq!(agg.precision.robustness, Some(Robustness::High));
        assert_eq!(agg.robustness(), agg.f1.robustness);
        assert_eq!(agg.robustness(), Some(Robustness::Low));
    }

    #[test]
    fn test_no_folds() {
        assert!(AggregateMetrics::from_folds(&[]).is_none());
    }
}
