use super::tabular::TabularDataset;
use crate::error::{Result, TrendcastError};
use crate::ml::labeling::LabeledTable;
use crate::types::{feature_matrix, DateRange};

/// Flattens trailing windows of daily feature rows into tabular samples.
///
/// The sample for day `i` reads rows `i-n ..= i-1` (oldest first) and takes
/// the label of day `i`. Windows touching an incomplete row are skipped.
#[derive(Debug, Clone, Copy)]
pub struct WindowStructurer {
    lookback: usize,
}

impl WindowStructurer {
    pub fn new(lookback: usize) -> Result<Self> {
        if lookback == 0 {
            return Err(TrendcastError::Configuration(
                "Lookback size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { lookback })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// `{feature}_lag_{k}` for k = n down to 1, features in table order within each lag
    pub fn column_names(&self, features: &[String]) -> Vec<String> {
        let mut names = Vec::with_capacity(self.lookback * features.len());
        for lag in (1..=self.lookback).rev() {
            for feature in features {
                names.push(format!("{}_lag_{}", feature, lag));
            }
        }
        names
    }

    pub fn structure(&self, labeled: &LabeledTable) -> Result<TabularDataset> {
        let table = labeled.features();
        let labels = labeled.labels();
        let n = self.lookback;
        let total = table.len();

        if total <= n {
            let span = table
                .date_range()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "no dates".to_string());
            return Err(TrendcastError::Configuration(format!(
                "Lookback {} needs more than {} labeled days to form one window, got {} ({})",
                n, n, total, span
            )));
        }

        let complete: Vec<bool> = (0..total).map(|i| table.is_complete(i)).collect();

        let width = n * table.width();
        let mut data = Vec::with_capacity((total - n) * width);
        let mut dates = Vec::with_capacity(total - n);
        let mut windows = Vec::with_capacity(total - n);
        let mut sample_labels = Vec::with_capacity(total - n);
        let mut skipped = 0usize;

        for i in n..total {
            let start = i - n;
            if !complete[start..i].iter().all(|&c| c) {
                skipped += 1;
                continue;
            }

            for row in start..i {
                // complete rows only, checked above
                data.extend(table.row(row).iter().flatten());
            }
            dates.push(table.date(i));
            windows.push(DateRange::new(table.date(start), table.date(i - 1)));
            sample_labels.push(labels[i]);
        }

        if dates.is_empty() {
            return Err(TrendcastError::Configuration(format!(
                "No complete {}-day window in {} labeled days {} .. {} ({} complete rows); \
                 the first sample would be labeled {}, upstream warm-up leaves nothing to train on",
                n,
                total,
                table.date(0),
                table.date(total - 1),
                table.complete_rows(),
                table.date(n)
            )));
        }

        if skipped > 0 {
            log::info!(
                "Skipped {} windows containing incomplete feature rows",
                skipped
            );
        }
        log::info!(
            "Structured {} samples x {} columns (lookback {}, {} features)",
            dates.len(),
            width,
            n,
            table.width()
        );

        let rows = dates.len();
        TabularDataset::new(
            self.column_names(table.feature_names()),
            dates,
            windows,
            feature_matrix(rows, width, data)?,
            sample_labels,
        )
    }
}
