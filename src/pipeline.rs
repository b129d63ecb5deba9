use crate::config::{AppConfig, ConfigSection, SchemaConfig};
use crate::engines::metrics::ClassificationMetrics;
use crate::engines::scaling::{FittedScaler, StandardScaler};
use crate::engines::splitters::{ChronologicalSplitter, DataSplit};
use crate::engines::validation::{
    evaluate_split, FoldOutcome, ModelComparison, WalkForwardReport, WalkForwardValidator,
};
use crate::data::extract_numeric;
use crate::error::{Result, TrendcastError};
use crate::ml::dataset::{TabularDataset, WindowStructurer};
use crate::ml::features::{FeatureConfig, FeatureEngineer, FeatureTable, PriceSeries};
use crate::ml::labeling::{class_balance_weight, ClassBalance, LabelBuilder};
use crate::ml::models::{build_baseline, build_classifier, Classifier, FitParams};
use crate::types::DateRange;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Where the per-day feature columns come from
#[derive(Debug, Clone)]
pub enum FeatureSource {
    /// The schema's `feature_columns`, read as-is from the frame
    Columns,
    /// Indicators computed from the close (and volume, when mapped)
    Engineered(FeatureConfig),
}

impl FeatureSource {
    /// Column roles the raw input must carry for this source
    pub fn input_schema(&self, schema: &SchemaConfig) -> SchemaConfig {
        match self {
            Self::Columns => schema.clone(),
            Self::Engineered(_) => schema.without_features(),
        }
    }
}

/// Static split after scaling, plus the scaler fitted on its train side
#[derive(Debug, Clone)]
pub struct PreparedSplit {
    pub split: DataSplit,
    pub scaler: FittedScaler,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub samples: usize,
    pub lookback: usize,
    pub columns: Vec<String>,
    pub date_range: Option<DateRange>,
    pub class_balance: ClassBalance,
}

/// Whether a holdout fit uses the training partition's class weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeighting {
    /// `negatives / positives` of the training labels
    Balanced,
    Unweighted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldoutReport {
    pub model: String,
    pub weighting: ClassWeighting,
    pub boundary_date: NaiveDate,
    pub train_range: DateRange,
    pub test_range: DateRange,
    pub train_samples: usize,
    pub test_samples: usize,
    pub train_balance: ClassBalance,
    pub test_balance: ClassBalance,
    pub class_weight: f64,
    /// Degenerate holdouts are reported here instead of aborting the run
    pub outcome: FoldOutcome,
}

impl HoldoutReport {
    pub fn metrics(&self) -> Option<&ClassificationMetrics> {
        self.outcome.metrics()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub dataset: DatasetSummary,
    /// Unweighted baseline model on the static split
    pub baseline: HoldoutReport,
    /// Class-weighted main model on the static split
    pub holdout: HoldoutReport,
    pub walk_forward: WalkForwardReport,
    pub comparison: ModelComparison,
}

/// End-to-end next-day direction pipeline driven by an [`AppConfig`]
pub struct DirectionPipeline {
    config: AppConfig,
}

impl DirectionPipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Label, align and window a raw frame into the sample table
    pub fn build_dataset(&self, df: &DataFrame, source: &FeatureSource) -> Result<TabularDataset> {
        let schema = &self.config.schema;
        let prices = PriceSeries::from_frame(df, schema)?;

        let features = match source {
            FeatureSource::Columns => {
                if schema.feature_columns.is_empty() {
                    return Err(TrendcastError::Schema(format!(
                        "No feature columns mapped in [{}]",
                        SchemaConfig::section_name()
                    )));
                }
                FeatureTable::from_frame(df, schema)?
            }
            FeatureSource::Engineered(feature_config) => {
                let volume = match &schema.volume_column {
                    Some(name) => Some(extract_numeric(df, name)?),
                    None => None,
                };
                FeatureEngineer::new(feature_config.clone()).engineer(&prices, volume.as_deref())?
            }
        };

        let labeled = LabelBuilder::new().label(&prices, &features)?;
        let dataset = WindowStructurer::new(self.config.dataset.lookback)?.structure(&labeled)?;

        let balance = dataset.class_balance();
        log::info!(
            "Dataset: {} samples x {} columns, {:.1}% up / {:.1}% down",
            dataset.len(),
            dataset.columns().len(),
            balance.up_pct,
            balance.down_pct
        );
        if balance.is_imbalanced() {
            log::warn!(
                "Labels are imbalanced (ratio {:.2})",
                balance.imbalance_ratio().unwrap_or(f64::INFINITY)
            );
        }
        Ok(dataset)
    }

    pub fn summarize(&self, dataset: &TabularDataset) -> DatasetSummary {
        DatasetSummary {
            samples: dataset.len(),
            lookback: self.config.dataset.lookback,
            columns: dataset.columns().to_vec(),
            date_range: dataset.date_range(),
            class_balance: dataset.class_balance(),
        }
    }

    /// Chronological split with both sides standardized by train statistics
    pub fn prepare_split(&self, dataset: &TabularDataset) -> Result<PreparedSplit> {
        let split = ChronologicalSplitter::new(self.config.dataset.train_fraction)?.split_once(dataset)?;
        let scaler = StandardScaler::new(&self.config.scaling).fit(&split.train)?;

        let train = scaler.apply(&split.train)?;
        let test = scaler.apply(&split.test)?;
        Ok(PreparedSplit {
            split: DataSplit { train, test, ..split },
            scaler,
        })
    }

    /// Fit on the static train prefix and score on the held-out suffix.
    ///
    /// The scaler is fitted on the train prefix only. A degenerate split or a
    /// fold-local failure is carried in [`HoldoutReport::outcome`].
    pub fn holdout(
        &self,
        dataset: &TabularDataset,
        classifier: &dyn Classifier,
        weighting: ClassWeighting,
    ) -> Result<HoldoutReport> {
        let split = ChronologicalSplitter::new(self.config.dataset.train_fraction)?.split_once(dataset)?;

        let class_weight = match weighting {
            ClassWeighting::Balanced => class_balance_weight(split.train.labels()),
            ClassWeighting::Unweighted => 1.0,
        };
        let params = FitParams {
            class_weight,
            seed: self.config.walk_forward.base_seed,
        };
        let scaler = StandardScaler::new(&self.config.scaling);
        let outcome = evaluate_split(&split, &scaler, classifier, &params)?;

        match &outcome {
            FoldOutcome::Scored { metrics } => log::info!(
                "Holdout {} ({:?}): accuracy {:.3}, precision {:.3}, recall {:.3}, f1 {:.3}",
                classifier.name(),
                weighting,
                metrics.accuracy,
                metrics.precision,
                metrics.recall,
                metrics.f1
            ),
            FoldOutcome::Failed { stage, reason } => log::warn!(
                "Holdout {} ({:?}) failed at {:?}: {}",
                classifier.name(),
                weighting,
                stage,
                reason
            ),
        }

        Ok(HoldoutReport {
            model: classifier.name().to_string(),
            weighting,
            boundary_date: split.boundary_date(),
            train_range: split.train_range,
            test_range: split.test_range,
            train_samples: split.train.len(),
            test_samples: split.test.len(),
            train_balance: split.train.class_balance(),
            test_balance: split.test.class_balance(),
            class_weight,
            outcome,
        })
    }

    pub fn walk_forward(
        &self,
        dataset: &TabularDataset,
        classifier: Box<dyn Classifier>,
    ) -> Result<WalkForwardReport> {
        WalkForwardValidator::new(self.config.walk_forward.clone(), &self.config.scaling, classifier)
            .validate(dataset)
    }

    /// Dataset construction, baseline and main holdouts, walk-forward of the
    /// main model and the comparison of all three
    pub fn run(&self, df: &DataFrame, source: &FeatureSource) -> Result<PipelineReport> {
        let dataset = self.build_dataset(df, source)?;

        let baseline = self.holdout(
            &dataset,
            build_baseline(&self.config.model).as_ref(),
            ClassWeighting::Unweighted,
        )?;
        let holdout = self.holdout(
            &dataset,
            build_classifier(&self.config.model).as_ref(),
            ClassWeighting::Balanced,
        )?;
        let walk_forward = self.walk_forward(&dataset, build_classifier(&self.config.model))?;

        let mut comparison = ModelComparison::new();
        comparison
            .add_holdout("baseline", &baseline.model, &baseline.outcome)
            .add_holdout("main", &holdout.model, &holdout.outcome)
            .add_walk_forward("main", &holdout.model, &walk_forward);
        log::info!("Model comparison:\n{}", comparison.render());

        if let Some(aggregate) = &walk_forward.aggregate {
            if let (Some(cv), Some(grade)) = (aggregate.f1.cv, aggregate.robustness()) {
                log::info!(
                    "Walk-forward robustness: {} (F1 coefficient of variation {:.3} over {} folds)",
                    grade,
                    cv,
                    aggregate.folds
                );
            }
        }

        Ok(PipelineReport {
            dataset: self.summarize(&dataset),
            baseline,
            holdout,
            walk_forward,
            comparison,
        })
    }
}
