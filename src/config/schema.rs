use super::traits::ConfigSection;
use crate::error::TrendcastError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Explicit column roles of the input frame.
///
/// Every role is named up front; nothing is located by guessing column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub date_column: String,
    pub close_column: String,
    #[serde(default)]
    pub volume_column: Option<String>,
    /// Columns fed to the window structurer, in schema order
    pub feature_columns: Vec<String>,
}

impl SchemaConfig {
    pub fn new(date_column: &str, close_column: &str, feature_columns: &[&str]) -> Self {
        Self {
            date_column: date_column.to_string(),
            close_column: close_column.to_string(),
            volume_column: None,
            feature_columns: feature_columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_volume(mut self, volume_column: &str) -> Self {
        self.volume_column = Some(volume_column.to_string());
        self
    }

    /// Same roles with no feature columns, for inputs that only carry prices
    pub fn without_features(&self) -> Self {
        Self {
            feature_columns: Vec::new(),
            ..self.clone()
        }
    }

    /// Numeric columns the frame must carry: close, volume if mapped, features
    pub fn numeric_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.close_column.as_str()];
        if let Some(volume) = &self.volume_column {
            cols.push(volume.as_str());
        }
        for feature in &self.feature_columns {
            if !cols.contains(&feature.as_str()) {
                cols.push(feature.as_str());
            }
        }
        cols
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            close_column: "close".to_string(),
            volume_column: Some("volume".to_string()),
            feature_columns: Vec::new(),
        }
    }
}

impl ConfigSection for SchemaConfig {
    fn section_name() -> &'static str {
        "schema"
    }

    fn validate(&self) -> Result<(), TrendcastError> {
        if self.date_column.trim().is_empty() {
            return Err(TrendcastError::Schema("date role is unmapped".to_string()));
        }
        if self.close_column.trim().is_empty() {
            return Err(TrendcastError::Schema("close price role is unmapped".to_string()));
        }
        if self.volume_column.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(TrendcastError::Schema(
                "volume role is mapped to an empty column name".to_string(),
            ));
        }
        if self.feature_columns.iter().any(|f| *f == self.date_column) {
            return Err(TrendcastError::Schema(format!(
                "date column '{}' cannot be used as a feature",
                self.date_column
            )));
        }

        let mut seen = HashSet::new();
        for feature in &self.feature_columns {
            if !seen.insert(feature.as_str()) {
                return Err(TrendcastError::Schema(format!(
                    "feature column '{}' is listed twice",
                    feature
                )));
            }
        }
        Ok(())
    }
}
