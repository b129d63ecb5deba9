use crate::config::SchemaConfig;
use crate::data::{extract_dates, extract_numeric, DataValidator};
use crate::error::{Result, TrendcastError};
use crate::types::DateRange;
use chrono::NaiveDate;
use polars::prelude::*;

/// Ordered close prices, one per trading day
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(TrendcastError::Schema(format!(
                "{} dates but {} close prices",
                dates.len(),
                closes.len()
            )));
        }
        DataValidator::validate_dates(&dates)?;
        if let Some(i) = closes.iter().position(|c| !c.is_finite()) {
            return Err(TrendcastError::Schema(format!(
                "Close price on {} is not a finite number",
                dates[i]
            )));
        }
        Ok(Self { dates, closes })
    }

    pub fn from_frame(df: &DataFrame, schema: &SchemaConfig) -> Result<Self> {
        let dates = extract_dates(df, &schema.date_column)?;
        let raw = extract_numeric(df, &schema.close_column)?;

        let mut closes = Vec::with_capacity(raw.len());
        for (date, value) in dates.iter().zip(raw) {
            match value {
                Some(v) => closes.push(v),
                None => {
                    return Err(TrendcastError::Schema(format!(
                        "Close price missing on {}",
                        date
                    )))
                }
            }
        }
        Self::new(dates, closes)
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }
}

/// Per-day matrix of causal indicator columns.
///
/// Cells are `None` where an upstream rolling computation has not warmed up
/// yet. The table is never filled in place; consumers skip incomplete rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    dates: Vec<NaiveDate>,
    names: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl FeatureTable {
    pub fn new(
        dates: Vec<NaiveDate>,
        names: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        if names.is_empty() {
            return Err(TrendcastError::Schema(
                "Feature table needs at least one feature column".to_string(),
            ));
        }
        if dates.len() != rows.len() {
            return Err(TrendcastError::Schema(format!(
                "{} dates but {} feature rows",
                dates.len(),
                rows.len()
            )));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != names.len()) {
            return Err(TrendcastError::Schema(format!(
                "Row for {} has {} values, expected {}",
                dates[i],
                row.len(),
                names.len()
            )));
        }
        DataValidator::validate_dates(&dates)?;

        Ok(Self { dates, names, rows })
    }

    /// Build from named columns of equal length
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<Option<f64>>)>) -> Result<Self> {
        let (names, values): (Vec<String>, Vec<Vec<Option<f64>>>) = columns.into_iter().unzip();
        if let Some((name, col)) = names.iter().zip(&values).find(|(_, c)| c.len() != dates.len()) {
            return Err(TrendcastError::Schema(format!(
                "Feature column '{}' has {} values for {} dates",
                name,
                col.len(),
                dates.len()
            )));
        }

        let rows = (0..dates.len())
            .map(|i| values.iter().map(|col| col[i]).collect())
            .collect();
        Self::new(dates, names, rows)
    }

    /// Read the schema's feature columns from a frame
    pub fn from_frame(df: &DataFrame, schema: &SchemaConfig) -> Result<Self> {
        DataValidator::validate_schema(df, schema)?;
        let dates = extract_dates(df, &schema.date_column)?;

        let mut columns = Vec::with_capacity(schema.feature_columns.len());
        for name in &schema.feature_columns {
            columns.push((name.clone(), extract_numeric(df, name)?));
        }
        Self::from_columns(dates, columns)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn date(&self, i: usize) -> NaiveDate {
        self.dates[i]
    }

    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    pub fn row(&self, i: usize) -> &[Option<f64>] {
        &self.rows[i]
    }

    /// Every feature of day `i` is present
    pub fn is_complete(&self, i: usize) -> bool {
        self.rows[i].iter().all(Option::is_some)
    }

    pub fn complete_rows(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_complete(i)).count()
    }

    pub fn date_range(&self) -> Option<DateRange> {
        DateRange::of(&self.dates)
    }

    /// New table holding the first `len` days
    pub fn head(&self, len: usize) -> Self {
        let len = len.min(self.len());
        Self {
            dates: self.dates[..len].to_vec(),
            names: self.names.clone(),
            rows: self.rows[..len].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_from_frame_keeps_schema_order() {
        let df = df! {
            "date" => &["2024-03-01", "2024-03-04", "2024-03-05"],
            "close" => &[10.0, 11.0, 12.0],
            "rsi" => &[None, Some(40.0), Some(45.0)],
        }
        .unwrap();
        let schema = SchemaConfig::new("date", "close", &["rsi", "close"]);

        let table = FeatureTable::from_frame(&df, &schema).unwrap();
        assert_eq!(table.feature_names(), &["rsi".to_string(), "close".to_string()]);
        assert_eq!(table.row(0), &[None, Some(10.0)]);
        assert!(!table.is_complete(0));
        assert!(table.is_complete(1));
        assert_eq!(table.complete_rows(), 2);
    }

    #[test]
    fn test_missing_close_price_rejected() {
        let df = df! {
            "date" => &["2024-03-01", "2024-03-04"],
            "close" => &[Some(10.0), None],
        }
        .unwrap();
        let schema = SchemaConfig::new("date", "close", &["close"]);

        let err = PriceSeries::from_frame(&df, &schema).unwrap_err();
        assert!(err.to_string().contains("2024-03-04"), "{}", err);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = FeatureTable::from_columns(
            vec![day(1), day(2)],
            vec![("a".to_string(), vec![Some(1.0)])],
        );
        assert!(matches!(result, Err(TrendcastError::Schema(_))));
    }

    #[test]
    fn test_head_does_not_touch_source() {
        let table = FeatureTable::from_columns(
            vec![day(1), day(2), day(3)],
            vec![("a".to_string(), vec![Some(1.0), Some(2.0), Some(3.0)])],
        )
        .unwrap();

        let head = table.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(table.len(), 3);
    }
}
