pub mod connectors;
pub mod frame;

pub use connectors::{CsvConnector, DataValidator, DatasetMetadata};
pub use frame::{extract_dates, extract_numeric};
