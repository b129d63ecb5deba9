pub mod baseline;
pub mod logistic;
pub mod traits;

pub use baseline::{ConstantClassifier, MajorityClassifier};
pub use logistic::LogisticRegression;
pub use traits::{Classifier, FitParams, TrainedModel};

use crate::config::{ModelConfig, ModelKind};

/// Main classifier described by the model section of the config
pub fn build_classifier(config: &ModelConfig) -> Box<dyn Classifier> {
    build_model(&config.kind)
}

/// Baseline classifier described by the model section of the config
pub fn build_baseline(config: &ModelConfig) -> Box<dyn Classifier> {
    build_model(&config.baseline)
}

pub fn build_model(kind: &ModelKind) -> Box<dyn Classifier> {
    match kind {
        ModelKind::Constant { prediction } => Box::new(ConstantClassifier::new(*prediction)),
        ModelKind::Majority => Box::new(MajorityClassifier),
        ModelKind::LogisticRegression {
            learning_rate,
            epochs,
            l2,
        } => Box::new(LogisticRegression::new(*learning_rate, *epochs, *l2)),
    }
}
