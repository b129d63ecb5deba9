use crate::types::DateRange;
use serde::{Deserialize, Serialize};

/// Role a column plays in the input frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Date,
    Close,
    Volume,
    Feature,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Close => "close",
            Self::Volume => "volume",
            Self::Feature => "feature",
        }
    }
}

/// Metadata about loaded CSV data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<String>,
    pub date_range: Option<DateRange>,
    pub price_range: (f64, f64), // (min, max)
    pub null_counts: Vec<(String, usize)>,
}
