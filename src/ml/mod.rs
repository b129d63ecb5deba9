pub mod dataset;
pub mod features;
pub mod labeling;
pub mod models;

pub use dataset::{PartitionRole, TabularDataset, WindowStructurer};
pub use features::{FeatureTable, PriceSeries};
pub use labeling::{ClassBalance, LabelBuilder, LabeledTable};
pub use models::{build_baseline, build_classifier, Classifier, FitParams, TrainedModel};
