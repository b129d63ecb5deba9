pub mod aggregate;
pub mod classification;

pub use aggregate::{AggregateMetrics, MetricSummary, Robustness};
pub use classification::{ClassificationMetrics, ConfusionMatrix, Degeneracy};
