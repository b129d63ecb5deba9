use super::{types::DatasetMetadata, validator::DataValidator};
use crate::config::SchemaConfig;
use crate::data::frame::{extract_dates, extract_numeric};
use crate::error::{Result, TrendcastError};
use crate::types::DateRange;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| TrendcastError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a CSV and check it against the column roles before anything else touches it
    pub fn load_and_validate<P: AsRef<Path>>(
        path: P,
        schema: &SchemaConfig,
        min_rows: usize,
    ) -> Result<DataFrame> {
        let df = Self::load(&path)?;

        DataValidator::validate_schema(&df, schema)?;
        DataValidator::validate_minimum_rows(&df, min_rows)?;

        let dates = extract_dates(&df, &schema.date_column)?;
        DataValidator::validate_dates(&dates)?;

        // Warm-up gaps are expected upstream; they are dropped later, never filled
        let null_report = DataValidator::check_nulls(&df);
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        log::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.as_ref().display()
        );
        Ok(df)
    }

    /// Create metadata for a loaded DataFrame
    pub fn create_metadata<P: AsRef<Path>>(
        path: P,
        df: &DataFrame,
        schema: &SchemaConfig,
    ) -> Result<DatasetMetadata> {
        let columns: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();

        let dates = extract_dates(df, &schema.date_column)?;
        let closes = extract_numeric(df, &schema.close_column)?;
        let price_range = closes.iter().flatten().fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            })
        });

        Ok(DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            num_columns: df.width(),
            columns,
            date_range: DateRange::of(&dates),
            price_range: price_range.unwrap_or((0.0, 0.0)),
            null_counts: DataValidator::check_nulls(df),
        })
    }

    /// Write a frame as CSV with a header row
    pub fn write<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<()> {
        let mut file = File::create(path.as_ref())?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)?;
        Ok(())
    }
}
