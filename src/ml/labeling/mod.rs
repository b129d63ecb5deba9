pub mod balance;
pub mod builder;

pub use balance::{class_balance_weight, ClassBalance};
pub use builder::{LabelBuilder, LabelSeries, LabeledTable};
