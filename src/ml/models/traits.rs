use crate::error::{Result, TrendcastError};
use crate::types::{Direction, FeatureMatrix};

/// Per-fit inputs that must never come from process-wide defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Multiplier on the loss of positive (`Up`) samples
    pub class_weight: f64,
    pub seed: u64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            class_weight: 1.0,
            seed: 0,
        }
    }
}

/// Something that can be fitted on scaled features and binary labels.
///
/// Every call to `fit` returns an independent model; a classifier holds only
/// hyperparameters and is shared read-only across folds.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn fit(&self, x: &FeatureMatrix, y: &[Direction], params: &FitParams) -> Result<Box<dyn TrainedModel>>;
}

pub trait TrainedModel: Send + Sync {
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Direction>>;

    /// Probability of `Up`; hard predictions by default
    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        Ok(self.predict(x)?.into_iter().map(Direction::as_f64).collect())
    }
}

pub(crate) fn check_training_input(x: &FeatureMatrix, y: &[Direction], params: &FitParams) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(TrendcastError::Model(format!(
            "{} feature rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    if y.is_empty() {
        return Err(TrendcastError::Model("Cannot fit on zero samples".to_string()));
    }
    if !(params.class_weight.is_finite() && params.class_weight > 0.0) {
        return Err(TrendcastError::Model(format!(
            "Class weight must be positive and finite, got {}",
            params.class_weight
        )));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(TrendcastError::Model(
            "Training features contain non-finite values".to_string(),
        ));
    }
    Ok(())
}
