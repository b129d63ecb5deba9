use crate::error::{Result, TrendcastError};
use crate::ml::dataset::{PartitionRole, TabularDataset};
use crate::types::DateRange;
use chrono::NaiveDate;
use std::ops::Range;

/// Row ranges of one train/test pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldBounds {
    pub train: Range<usize>,
    pub test: Range<usize>,
}

/// Single chronological train/test pair
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub train: TabularDataset,
    pub test: TabularDataset,
    pub fold_num: usize,
    pub train_range: DateRange,
    pub test_range: DateRange,
}

impl DataSplit {
    /// Cut `data` at `bounds`, refusing any pair whose train side does not end
    /// strictly before its test side begins
    pub fn from_bounds(data: &TabularDataset, bounds: &FoldBounds, fold_num: usize) -> Result<Self> {
        if bounds.train.is_empty() || bounds.test.is_empty() {
            return Err(TrendcastError::Configuration(format!(
                "Fold {} would have {} train and {} test samples; both must be non-empty",
                fold_num,
                bounds.train.len(),
                bounds.test.len()
            )));
        }
        if bounds.train.end > bounds.test.start || bounds.test.end > data.len() {
            return Err(TrendcastError::Configuration(format!(
                "Fold {} bounds {:?}/{:?} are out of order for {} samples",
                fold_num,
                bounds.train,
                bounds.test,
                data.len()
            )));
        }

        let train = data.slice(bounds.train.start, bounds.train.end, PartitionRole::Train);
        let test = data.slice(bounds.test.start, bounds.test.end, PartitionRole::Test);

        // both partitions are non-empty here
        let train_range = train.date_range().ok_or_else(|| empty_partition(fold_num))?;
        let test_range = test.date_range().ok_or_else(|| empty_partition(fold_num))?;
        if train_range.end >= test_range.start {
            return Err(TrendcastError::TemporalOrder(format!(
                "train partition ends {}, after test partition start {}",
                train_range.end, test_range.start
            )));
        }

        Ok(Self {
            train,
            test,
            fold_num,
            train_range,
            test_range,
        })
    }

    /// First day of the test side
    pub fn boundary_date(&self) -> NaiveDate {
        self.test_range.start
    }
}

fn empty_partition(fold_num: usize) -> TrendcastError {
    TrendcastError::Configuration(format!("Fold {} has an empty partition", fold_num))
}
