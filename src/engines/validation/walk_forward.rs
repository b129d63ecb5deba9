use super::fold::{evaluate_split, FoldOutcome};
use crate::config::{ScalingConfig, WalkForwardConfig};
use crate::engines::metrics::{AggregateMetrics, ClassificationMetrics};
use crate::engines::scaling::StandardScaler;
use crate::engines::splitters::{DataSplit, DataSplitter, ExpandingWindowSplitter};
use crate::error::Result;
use crate::ml::dataset::TabularDataset;
use crate::ml::labeling::class_balance_weight;
use crate::ml::models::{Classifier, FitParams};
use crate::types::DateRange;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldRecord {
    pub fold: usize,
    pub train_range: DateRange,
    pub test_range: DateRange,
    pub train_samples: usize,
    pub test_samples: usize,
    pub class_weight: f64,
    pub seed: u64,
    pub outcome: FoldOutcome,
}

impl FoldRecord {
    pub fn metrics(&self) -> Option<&ClassificationMetrics> {
        self.outcome.metrics()
    }

    pub fn is_scored(&self) -> bool {
        self.outcome.is_scored()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardReport {
    pub method: String,
    pub total_folds: usize,
    pub succeeded_folds: usize,
    pub failed_folds: usize,
    pub folds: Vec<FoldRecord>,
    /// Over scored folds only; `None` when every fold failed
    pub aggregate: Option<AggregateMetrics>,
}

/// Expanding-window validation with a fresh scaler, class weight and model
/// per fold. Fold failures are recorded on the fold and do not stop the run.
pub struct WalkForwardValidator {
    config: WalkForwardConfig,
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
}

impl WalkForwardValidator {
    pub fn new(
        config: WalkForwardConfig,
        scaling: &ScalingConfig,
        classifier: Box<dyn Classifier>,
    ) -> Self {
        Self {
            config,
            scaler: StandardScaler::new(scaling),
            classifier,
        }
    }

    pub fn name(&self) -> &str {
        "Walk-Forward Validation"
    }

    pub fn validate(&self, data: &TabularDataset) -> Result<WalkForwardReport> {
        let splitter = ExpandingWindowSplitter::new(self.config.n_folds)?;
        let splits = splitter.split(data)?;

        log::info!(
            "Walk-forward: {} folds over {} samples with {} ({})",
            splits.len(),
            data.len(),
            self.classifier.name(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        let folds = if self.config.parallel {
            splits
                .par_iter()
                .map(|split| self.run_fold(split))
                .collect::<Result<Vec<_>>>()?
        } else {
            splits
                .iter()
                .map(|split| self.run_fold(split))
                .collect::<Result<Vec<_>>>()?
        };

        let scored: Vec<ClassificationMetrics> =
            folds.iter().filter_map(|f| f.metrics().copied()).collect();
        let aggregate = AggregateMetrics::from_folds(&scored);

        let total_folds = folds.len();
        let succeeded_folds = scored.len();
        log::info!(
            "Walk-forward finished: {} of {} folds scored",
            succeeded_folds,
            total_folds
        );

        Ok(WalkForwardReport {
            method: self.name().to_string(),
            total_folds,
            succeeded_folds,
            failed_folds: total_folds - succeeded_folds,
            folds,
            aggregate,
        })
    }

    /// Class weight and seed for this fold, then the shared fold evaluation
    fn run_fold(&self, split: &DataSplit) -> Result<FoldRecord> {
        let class_weight = class_balance_weight(split.train.labels());
        let seed = self
            .config
            .base_seed
            .wrapping_add(split.fold_num.saturating_sub(1) as u64);
        let params = FitParams { class_weight, seed };

        let outcome = evaluate_split(split, &self.scaler, self.classifier.as_ref(), &params)?;

        Ok(FoldRecord {
            fold: split.fold_num,
            train_range: split.train_range,
            test_range: split.test_range,
            train_samples: split.train.len(),
            test_samples: split.test.len(),
            class_weight,
            seed,
            outcome,
        })
    }
}
