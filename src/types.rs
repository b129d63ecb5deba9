use crate::error::{Result, TrendcastError};
use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Next-day price direction, the binary target of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Down = 0, // close[t+1] <= close[t]
    Up = 1,   // close[t+1] > close[t]
}

impl Direction {
    pub fn from_closes(today: f64, tomorrow: f64) -> Self {
        if tomorrow > today {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_f64(self) -> f64 {
        self as u8 as f64
    }
}

/// Inclusive calendar range covered by a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range spanned by an ordered date slice, `None` when empty
    pub fn of(dates: &[NaiveDate]) -> Option<Self> {
        match (dates.first(), dates.last()) {
            (Some(&start), Some(&end)) => Some(Self { start, end }),
            _ => None,
        }
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Samples x columns feature matrix, one row per sample
pub type FeatureMatrix = Array2<f64>;

/// Row-major `rows x cols` matrix from flat values
pub fn feature_matrix(rows: usize, cols: usize, data: Vec<f64>) -> Result<FeatureMatrix> {
    let len = data.len();
    Array2::from_shape_vec((rows, cols), data).map_err(|e| {
        TrendcastError::Schema(format!(
            "{} values do not fill a {}x{} feature matrix: {}",
            len, rows, cols, e
        ))
    })
}
