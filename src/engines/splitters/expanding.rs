use super::base::DataSplitter;
use super::types::{DataSplit, FoldBounds};
use crate::error::{Result, TrendcastError};
use crate::ml::dataset::TabularDataset;

/// Expanding-window time-series cross-validation.
///
/// With `k` folds over `N` samples the test segments have
/// `N / (k + 1)` samples each and sit back to back at the end of the series;
/// the remainder of the division stays in the first training window. Fold `j`
/// trains on every sample before its test segment.
#[derive(Debug, Clone, Copy)]
pub struct ExpandingWindowSplitter {
    n_folds: usize,
}

impl ExpandingWindowSplitter {
    pub fn new(n_folds: usize) -> Result<Self> {
        if n_folds == 0 {
            return Err(TrendcastError::Configuration(
                "Walk-forward needs at least one fold".to_string(),
            ));
        }
        Ok(Self { n_folds })
    }

    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    pub fn bounds(&self, total_rows: usize) -> Result<Vec<FoldBounds>> {
        let k = self.n_folds;
        let test_size = total_rows / (k + 1);
        if test_size == 0 {
            return Err(TrendcastError::Configuration(format!(
                "{} samples cannot fill {} walk-forward folds; need at least {}",
                total_rows,
                k,
                k + 1
            )));
        }

        let first_test = total_rows - k * test_size;
        Ok((0..k)
            .map(|j| {
                let start = first_test + j * test_size;
                FoldBounds {
                    train: 0..start,
                    test: start..start + test_size,
                }
            })
            .collect())
    }
}

impl DataSplitter for ExpandingWindowSplitter {
    fn split(&self, data: &TabularDataset) -> Result<Vec<DataSplit>> {
        let splits = self
            .bounds(data.len())?
            .iter()
            .enumerate()
            .map(|(j, bounds)| DataSplit::from_bounds(data, bounds, j + 1))
            .collect::<Result<Vec<_>>>()?;

        for split in &splits {
            log::debug!(
                "Fold {}: train {} ({}), test {} ({})",
                split.fold_num,
                split.train_range,
                split.train.len(),
                split.test_range,
                split.test.len()
            );
        }
        Ok(splits)
    }

    fn name(&self) -> &str {
        "expanding_window"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_time_series_split_layout() {
        let bounds = ExpandingWindowSplitter::new(3).unwrap().bounds(55).unwrap();
        assert_eq!(
            bounds,
            vec![
                FoldBounds { train: 0..16, test: 16..29 },
                FoldBounds { train: 0..29, test: 29..42 },
                FoldBounds { train: 0..42, test: 42..55 },
            ]
        );
    }

    #[test]
    fn test_segments_are_contiguous_and_disjoint() {
        let bounds = ExpandingWindowSplitter::new(4).unwrap().bounds(103).unwrap();
        for pair in bounds.windows(2) {
            assert_eq!(pair[0].test.end, pair[1].test.start);
            assert_eq!(pair[1].train.end, pair[1].test.start);
        }
        assert_eq!(bounds.last().unwrap().test.end, 103);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(ExpandingWindowSplitter::new(3).unwrap().bounds(3).is_err());
        assert!(ExpandingWindowSplitter::new(3).unwrap().bounds(4).is_ok());
        assert!(ExpandingWindowSplitter::new(0).is_err());
    }
}
