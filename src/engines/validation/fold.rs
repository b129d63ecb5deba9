use crate::engines::metrics::{ClassificationMetrics, Degeneracy};
use crate::engines::scaling::StandardScaler;
use crate::engines::splitters::DataSplit;
use crate::error::Result;
use crate::ml::models::{Classifier, FitParams};
use serde::{Deserialize, Serialize};

/// Step a fold was in when it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoldStage {
    Split,
    FitScaler,
    Scale,
    FitModel,
    Predict,
    Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FoldOutcome {
    Scored { metrics: ClassificationMetrics },
    Failed { stage: FoldStage, reason: String },
}

impl FoldOutcome {
    pub fn metrics(&self) -> Option<&ClassificationMetrics> {
        match self {
            Self::Scored { metrics } => Some(metrics),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.metrics().is_some()
    }
}

/// Scales, fits, predicts and scores one train/test pair.
///
/// The scaler is fitted on the pair's train side only. Fold-local errors
/// come back as [`FoldOutcome::Failed`]; anything else is returned as `Err`.
pub fn evaluate_split(
    split: &DataSplit,
    scaler: &StandardScaler,
    classifier: &dyn Classifier,
    params: &FitParams,
) -> Result<FoldOutcome> {
    let mut stage = FoldStage::Split;
    match score_split(split, scaler, classifier, params, &mut stage) {
        Ok(metrics) => {
            log::debug!(
                "Fold {} scored: precision {:.3}, recall {:.3}, f1 {:.3}, accuracy {:.3}",
                split.fold_num,
                metrics.precision,
                metrics.recall,
                metrics.f1,
                metrics.accuracy
            );
            Ok(FoldOutcome::Scored { metrics })
        }
        Err(e) if e.is_fold_local() => {
            log::warn!(
                "Fold {} ({} / {}) failed at {:?}: {}",
                split.fold_num,
                split.train_range,
                split.test_range,
                stage,
                e
            );
            Ok(FoldOutcome::Failed {
                stage,
                reason: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

fn score_split(
    split: &DataSplit,
    scaler: &StandardScaler,
    classifier: &dyn Classifier,
    params: &FitParams,
    stage: &mut FoldStage,
) -> Result<ClassificationMetrics> {
    let fold = split.fold_num;

    if split.test.is_empty() {
        return Err(Degeneracy::EmptyTest.into_error(fold));
    }
    if let Some(class) = split.train.class_balance().sole_class() {
        return Err(Degeneracy::SingleClassTrain(class).into_error(fold));
    }
    if let Some(class) = split.test.class_balance().sole_class() {
        return Err(Degeneracy::SingleClassTest(class).into_error(fold));
    }

    *stage = FoldStage::FitScaler;
    let fitted = scaler.fit(&split.train)?;

    *stage = FoldStage::Scale;
    let train = fitted.apply(&split.train)?;
    let test = fitted.apply(&split.test)?;

    *stage = FoldStage::FitModel;
    let model = classifier.fit(train.features(), train.labels(), params)?;

    *stage = FoldStage::Predict;
    let predictions = model.predict(test.features())?;

    *stage = FoldStage::Score;
    ClassificationMetrics::evaluate(test.labels(), &predictions, fold)
}
