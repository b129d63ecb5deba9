pub mod comparison;
pub mod fold;
pub mod walk_forward;

pub use comparison::{ComparisonRow, ComparisonScores, MetricCell, ModelComparison, Validation};
pub use fold::{evaluate_split, FoldOutcome, FoldStage};
pub use walk_forward::{FoldRecord, WalkForwardReport, WalkForwardValidator};
