pub mod engineer;
pub mod table;

pub use engineer::{FeatureConfig, FeatureEngineer};
pub use table::{FeatureTable, PriceSeries};
