use super::base::DataSplitter;
use super::types::{DataSplit, FoldBounds};
use crate::error::{Result, TrendcastError};
use crate::ml::dataset::TabularDataset;

/// Ordered train prefix / test suffix at `floor(p * N)`
#[derive(Debug, Clone, Copy)]
pub struct ChronologicalSplitter {
    train_fraction: f64,
}

impl ChronologicalSplitter {
    pub fn new(train_fraction: f64) -> Result<Self> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(TrendcastError::Configuration(format!(
                "Train fraction must be strictly between 0 and 1, got {}",
                train_fraction
            )));
        }
        Ok(Self { train_fraction })
    }

    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }

    pub fn bounds(&self, total_rows: usize) -> Result<FoldBounds> {
        if total_rows < 2 {
            return Err(TrendcastError::Configuration(format!(
                "Chronological split needs at least 2 samples, got {}",
                total_rows
            )));
        }

        let cut = (self.train_fraction * total_rows as f64).floor() as usize;
        if cut == 0 || cut >= total_rows {
            return Err(TrendcastError::Configuration(format!(
                "Train fraction {} on {} samples leaves {} train and {} test samples",
                self.train_fraction,
                total_rows,
                cut.min(total_rows),
                total_rows - cut.min(total_rows)
            )));
        }

        Ok(FoldBounds {
            train: 0..cut,
            test: cut..total_rows,
        })
    }

    pub fn split_once(&self, data: &TabularDataset) -> Result<DataSplit> {
        let bounds = match self.bounds(data.len()) {
            Ok(bounds) => bounds,
            Err(TrendcastError::Configuration(msg)) => {
                return Err(TrendcastError::Configuration(self.locate(&msg, data)))
            }
            Err(e) => return Err(e),
        };
        let split = DataSplit::from_bounds(data, &bounds, 0)?;

        log::info!(
            "Chronological split at {}: train {} ({} samples), test {} ({} samples)",
            split.boundary_date(),
            split.train_range,
            split.train.len(),
            split.test_range,
            split.test.len()
        );
        Ok(split)
    }

    /// Appends the dataset's dates and the would-be boundary to a count-only message
    fn locate(&self, msg: &str, data: &TabularDataset) -> String {
        let range = match data.date_range() {
            Some(range) => range.to_string(),
            None => return format!("{} (dataset has no dates)", msg),
        };
        let cut = (self.train_fraction * data.len() as f64).floor() as usize;
        match data.dates().get(cut) {
            Some(boundary) => format!("{} over {}; the test side would start on {}", msg, range, boundary),
            None => format!("{} over {}; the cut falls after the last date", msg, range),
        }
    }
}

impl DataSplitter for ChronologicalSplitter {
    fn split(&self, data: &TabularDataset) -> Result<Vec<DataSplit>> {
        Ok(vec![self.split_once(data)?])
    }

    fn name(&self) -> &str {
        "chronological"
    }
}
