use super::types::DataSplit;
use crate::error::Result;
use crate::ml::dataset::TabularDataset;

pub trait DataSplitter: Send + Sync {
    /// Split ordered samples into one or more train/test pairs
    fn split(&self, data: &TabularDataset) -> Result<Vec<DataSplit>>;

    fn name(&self) -> &str;
}
