use crate::error::{Result, TrendcastError};
use chrono::{DateTime, NaiveDate};
use polars::prelude::*;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Read a date column stored as `Date`, `Datetime`, or `%Y-%m-%d` strings
pub fn extract_dates(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
    let column = df
        .column(name)
        .map_err(|_| TrendcastError::Schema(format!("Missing date column '{}'", name)))?;

    match column.dtype() {
        DataType::Date => {
            let days = column.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    value
                        .and_then(|d| NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_DAYS_FROM_CE + d))
                        .ok_or_else(|| invalid_date(name, row))
                })
                .collect()
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let ticks = column.cast(&DataType::Int64)?;
            ticks
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    let datetime = value.and_then(|t| match unit {
                        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(t),
                        TimeUnit::Microseconds => DateTime::from_timestamp_micros(t),
                        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(t)),
                    });
                    datetime
                        .map(|dt| dt.date_naive())
                        .ok_or_else(|| invalid_date(name, row))
                })
                .collect()
        }
        DataType::String => column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
                    .ok_or_else(|| invalid_date(name, row))
            })
            .collect(),
        other => Err(TrendcastError::Schema(format!(
            "Date column '{}' has unsupported type {:?}",
            name, other
        ))),
    }
}

/// Read a numeric column as `f64`; nulls and non-finite values become `None`
pub fn extract_numeric(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| TrendcastError::Schema(format!("Missing required column '{}'", name)))?;

    if !is_numeric(column.dtype()) {
        return Err(TrendcastError::Schema(format!(
            "Column '{}' must be numeric, found {:?}",
            name,
            column.dtype()
        )));
    }

    let values = column.cast(&DataType::Float64)?;
    let values = values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

fn invalid_date(column: &str, row: usize) -> TrendcastError {
    TrendcastError::Schema(format!(
        "Unparseable or missing date in column '{}' at row {}",
        column, row
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_extract_string_dates() {
        let df = df! {
            "date" => &["2024-01-02", "2024-01-03"],
            "close" => &[10.0, 11.0],
        }
        .unwrap();

        let dates = extract_dates(&df, "date").unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_bad_date_reports_row() {
        let df = df! {
            "date" => &["2024-01-02", "not a date"],
        }
        .unwrap();

        let err = extract_dates(&df, "date").unwrap_err().to_string();
        assert!(err.contains("row 1"), "{}", err);
    }

    #[test]
    fn test_extract_numeric_casts_integers_and_masks_nan() {
        let df = df! {
            "volume" => &[100i64, 200, 300],
            "ratio" => &[1.0, f64::NAN, 2.0],
        }
        .unwrap();

        assert_eq!(
            extract_numeric(&df, "volume").unwrap(),
            vec![Some(100.0), Some(200.0), Some(300.0)]
        );
        assert_eq!(
            extract_numeric(&df, "ratio").unwrap(),
            vec![Some(1.0), None, Some(2.0)]
        );
    }

    #[test]
    fn test_non_numeric_column_is_schema_error() {
        let df = df! {
            "ticker" => &["A", "B"],
        }
        .unwrap();

        assert!(matches!(
            extract_numeric(&df, "ticker"),
            Err(TrendcastError::Schema(_))
        ));
    }
}
