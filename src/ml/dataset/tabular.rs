use crate::data::DataValidator;
use crate::error::{Result, TrendcastError};
use crate::ml::labeling::ClassBalance;
use crate::types::{DateRange, Direction, FeatureMatrix};
use chrono::NaiveDate;
use ndarray::s;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Which slice of the timeline a dataset stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionRole {
    Full,
    Train,
    Test,
}

/// Windowed samples in date order.
///
/// Row `i` holds the flattened features of the days in `feature_windows[i]`
/// and the direction label of `dates[i]`, which is strictly later than every
/// day feeding the row.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    columns: Vec<String>,
    dates: Vec<NaiveDate>,
    windows: Vec<DateRange>,
    features: FeatureMatrix,
    labels: Vec<Direction>,
    role: PartitionRole,
}

impl TabularDataset {
    pub fn new(
        columns: Vec<String>,
        dates: Vec<NaiveDate>,
        windows: Vec<DateRange>,
        features: FeatureMatrix,
        labels: Vec<Direction>,
    ) -> Result<Self> {
        let n = dates.len();
        if windows.len() != n || labels.len() != n || features.nrows() != n {
            return Err(TrendcastError::Schema(format!(
                "Sample count mismatch: {} dates, {} windows, {} feature rows, {} labels",
                n,
                windows.len(),
                features.nrows(),
                labels.len()
            )));
        }
        if features.ncols() != columns.len() {
            return Err(TrendcastError::Schema(format!(
                "{} feature values per row but {} column names",
                features.ncols(),
                columns.len()
            )));
        }
        DataValidator::validate_dates(&dates)?;
        if let Some(i) = (0..n).find(|&i| windows[i].end >= dates[i]) {
            return Err(TrendcastError::TemporalOrder(format!(
                "sample labeled {} reads features through {}; features must end before the label day",
                dates[i], windows[i].end
            )));
        }

        Ok(Self {
            columns,
            dates,
            windows,
            features,
            labels,
            role: PartitionRole::Full,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Days that feed each sample's features
    pub fn feature_windows(&self) -> &[DateRange] {
        &self.windows
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn labels(&self) -> &[Direction] {
        &self.labels
    }

    pub fn role(&self) -> PartitionRole {
        self.role
    }

    pub fn date_range(&self) -> Option<DateRange> {
        DateRange::of(&self.dates)
    }

    pub fn class_balance(&self) -> ClassBalance {
        ClassBalance::from_labels(&self.labels)
    }

    /// Contiguous copy of rows `[start, end)` tagged with `role`
    pub fn slice(&self, start: usize, end: usize, role: PartitionRole) -> Self {
        Self {
            columns: self.columns.clone(),
            dates: self.dates[start..end].to_vec(),
            windows: self.windows[start..end].to_vec(),
            features: self.features.slice(s![start..end, ..]).to_owned(),
            labels: self.labels[start..end].to_vec(),
            role,
        }
    }

    /// Same samples with a transformed feature matrix of identical shape
    pub fn with_features(&self, features: FeatureMatrix) -> Result<Self> {
        if features.dim() != self.features.dim() {
            let (rows, cols) = features.dim();
            let (want_rows, want_cols) = self.features.dim();
            return Err(TrendcastError::Schema(format!(
                "Replacement features are {}x{}, dataset is {}x{}",
                rows, cols, want_rows, want_cols
            )));
        }
        Ok(Self {
            features,
            ..self.clone()
        })
    }

    /// Date, feature and `target` columns as a polars frame
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 2);

        let dates: Vec<String> = self.dates.iter().map(|d| d.to_string()).collect();
        columns.push(Column::new("date".into(), dates));

        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self.features.column(j).to_vec();
            columns.push(Column::new(name.as_str().into(), values));
        }

        let targets: Vec<i32> = self.labels.iter().map(|l| l.as_u8() as i32).collect();
        columns.push(Column::new("target".into(), targets));

        Ok(DataFrame::new(columns)?)
    }
}
