use super::types::ColumnRole;
use crate::config::SchemaConfig;
use crate::data::frame::is_numeric;
use crate::error::{Result, TrendcastError};
use chrono::NaiveDate;
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Check that every mapped role exists and that value columns are numeric
    pub fn validate_schema(df: &DataFrame, schema: &SchemaConfig) -> Result<()> {
        let columns = df.get_column_names();
        let has = |name: &str| columns.iter().any(|col| col.as_str() == name);

        if !has(&schema.date_column) {
            return Err(Self::missing(ColumnRole::Date, &schema.date_column));
        }
        if !has(&schema.close_column) {
            return Err(Self::missing(ColumnRole::Close, &schema.close_column));
        }
        if let Some(volume) = &schema.volume_column {
            if !has(volume) {
                return Err(Self::missing(ColumnRole::Volume, volume));
            }
        }
        for feature in &schema.feature_columns {
            if !has(feature) {
                return Err(Self::missing(ColumnRole::Feature, feature));
            }
        }

        for name in schema.numeric_columns() {
            let series = df.column(name)?;
            if !is_numeric(series.dtype()) {
                return Err(TrendcastError::Schema(format!(
                    "Column '{}' must be numeric, found {:?}",
                    name,
                    series.dtype()
                )));
            }
        }

        Ok(())
    }

    fn missing(role: ColumnRole, name: &str) -> TrendcastError {
        TrendcastError::Schema(format!(
            "Missing required {} column '{}'",
            role.as_str(),
            name
        ))
    }

    /// Dates must be unique and strictly increasing
    pub fn validate_dates(dates: &[NaiveDate]) -> Result<()> {
        for (i, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(TrendcastError::TemporalOrder(format!(
                    "row {} dated {} does not follow row {} dated {}; dates must be unique and strictly increasing",
                    i + 1,
                    pair[1],
                    i,
                    pair[0]
                )));
            }
        }
        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(TrendcastError::Configuration(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, only for columns that have any
    pub fn check_nulls(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }
}
