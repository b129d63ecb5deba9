use crate::error::{Result, TrendcastError};
use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary confusion counts with `Up` as the positive class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[Direction], y_pred: &[Direction]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(TrendcastError::Model(format!(
                "{} predictions for {} test labels",
                y_pred.len(),
                y_true.len()
            )));
        }

        let mut cm = Self::default();
        for (&actual, &predicted) in y_true.iter().zip(y_pred) {
            match (actual, predicted) {
                (Direction::Down, Direction::Down) => cm.tn += 1,
                (Direction::Down, Direction::Up) => cm.fp += 1,
                (Direction::Up, Direction::Down) => cm.fn_ += 1,
                (Direction::Up, Direction::Up) => cm.tp += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn actual_positives(&self) -> usize {
        self.tp + self.fn_
    }

    pub fn actual_negatives(&self) -> usize {
        self.tn + self.fp
    }

    pub fn predicted_positives(&self) -> usize {
        self.tp + self.fp
    }
}

/// Conditions under which a fold cannot produce well-defined metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degeneracy {
    EmptyTest,
    SingleClassTrain(Direction),
    SingleClassTest(Direction),
    NoPositivePredictions,
}

impl Degeneracy {
    pub fn into_error(self, fold: usize) -> TrendcastError {
        TrendcastError::DegenerateFold {
            fold,
            reason: self.to_string(),
        }
    }
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTest => write!(f, "test partition has no samples"),
            Self::SingleClassTrain(class) => {
                write!(f, "training labels are all {:?}", class)
            }
            Self::SingleClassTest(class) => {
                write!(f, "test labels are all {:?}; precision/recall undefined", class)
            }
            Self::NoPositivePredictions => {
                write!(f, "model predicted no Up days; precision undefined")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
    pub support: usize,
    pub confusion: ConfusionMatrix,
}

impl ClassificationMetrics {
    /// Precision, recall, F1 (positive class `Up`) and accuracy.
    ///
    /// Undefined metrics are reported as a [`Degeneracy`] rather than
    /// coerced to 0 or 1.
    pub fn from_confusion(cm: ConfusionMatrix) -> std::result::Result<Self, Degeneracy> {
        if cm.total() == 0 {
            return Err(Degeneracy::EmptyTest);
        }
        if cm.actual_positives() == 0 {
            return Err(Degeneracy::SingleClassTest(Direction::Down));
        }
        if cm.actual_negatives() == 0 {
            return Err(Degeneracy::SingleClassTest(Direction::Up));
        }
        if cm.predicted_positives() == 0 {
            return Err(Degeneracy::NoPositivePredictions);
        }

        let precision = cm.tp as f64 / cm.predicted_positives() as f64;
        let recall = cm.tp as f64 / cm.actual_positives() as f64;
        // both defined; a fold with zero true positives scores F1 = 0
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let accuracy = (cm.tp + cm.tn) as f64 / cm.total() as f64;

        Ok(Self {
            precision,
            recall,
            f1,
            accuracy,
            support: cm.total(),
            confusion: cm,
        })
    }

    /// Score predictions of a fold. Degenerate conditions come back as
    /// `DegenerateFold` errors tagged with `fold`.
    pub fn evaluate(y_true: &[Direction], y_pred: &[Direction], fold: usize) -> Result<Self> {
        let cm = ConfusionMatrix::from_labels(y_true, y_pred)?;
        Self::from_confusion(cm).map_err(|d| d.into_error(fold))
    }
}
