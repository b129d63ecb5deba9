pub mod base;
pub mod chronological;
pub mod expanding;
pub mod types;

pub use base::DataSplitter;
pub use chronological::ChronologicalSplitter;
pub use expanding::ExpandingWindowSplitter;
pub use types::{DataSplit, FoldBounds};
