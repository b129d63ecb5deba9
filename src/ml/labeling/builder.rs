use super::balance::ClassBalance;
use crate::error::{Result, TrendcastError};
use crate::ml::features::{FeatureTable, PriceSeries};
use crate::types::Direction;
use chrono::NaiveDate;

/// Next-day direction labels; the last observed day has no label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSeries {
    dates: Vec<NaiveDate>,
    labels: Vec<Direction>,
    dropped: NaiveDate,
}

impl LabelSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn labels(&self) -> &[Direction] {
        &self.labels
    }

    /// Final day of the price series, which has no future close to compare to
    pub fn dropped_date(&self) -> NaiveDate {
        self.dropped
    }
}

/// Feature table paired row-for-row with direction labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    features: FeatureTable,
    labels: Vec<Direction>,
}

impl LabeledTable {
    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn labels(&self) -> &[Direction] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn class_balance(&self) -> ClassBalance {
        ClassBalance::from_labels(&self.labels)
    }
}

/// Derives `label[t] = 1 if close[t+1] > close[t] else 0`
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelBuilder;

impl LabelBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, prices: &PriceSeries) -> Result<LabelSeries> {
        if prices.len() < 2 {
            return Err(TrendcastError::Configuration(format!(
                "Labeling needs at least 2 observations, got {}",
                prices.len()
            )));
        }

        let labels: Vec<Direction> = prices
            .closes()
            .windows(2)
            .map(|pair| Direction::from_closes(pair[0], pair[1]))
            .collect();

        let dates = prices.dates();
        let dropped = dates[dates.len() - 1];
        log::debug!("Built {} labels, dropped final day {}", labels.len(), dropped);

        Ok(LabelSeries {
            dates: dates[..dates.len() - 1].to_vec(),
            labels,
            dropped,
        })
    }

    /// Drop the unlabeled final day from `features` and attach the labels.
    ///
    /// The table must cover exactly the days of the price series the labels
    /// came from.
    pub fn align(&self, features: &FeatureTable, labels: &LabelSeries) -> Result<LabeledTable> {
        let expected = labels.len() + 1;
        if features.len() != expected {
            return Err(TrendcastError::Schema(format!(
                "Feature table has {} days but the price series had {}",
                features.len(),
                expected
            )));
        }
        if features.date(features.len() - 1) != labels.dropped_date() {
            return Err(TrendcastError::Schema(format!(
                "Feature table ends {}, price series ends {}",
                features.date(features.len() - 1),
                labels.dropped_date()
            )));
        }
        if let Some(i) = labels
            .dates()
            .iter()
            .zip(features.dates())
            .position(|(a, b)| a != b)
        {
            return Err(TrendcastError::Schema(format!(
                "Feature table date {} does not match price date {} at row {}",
                features.date(i),
                labels.dates()[i],
                i
            )));
        }

        Ok(LabeledTable {
            features: features.head(labels.len()),
            labels: labels.labels().to_vec(),
        })
    }

    /// `build` followed by `align`
    pub fn label(&self, prices: &PriceSeries, features: &FeatureTable) -> Result<LabeledTable> {
        let labels = self.build(prices)?;
        self.align(features, &labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 2, 3).unwrap();
        (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
    }

    #[test]
    fn test_single_observation_is_configuration_error() {
        let prices = PriceSeries::new(dates(1), vec![100.0]).unwrap();
        let result = LabelBuilder::new().build(&prices);
        assert!(matches!(result, Err(TrendcastError::Configuration(_))));
    }

    #[test]
    fn test_equal_close_is_down() {
        let prices = PriceSeries::new(dates(3), vec![100.0, 100.0, 100.5]).unwrap();
        let labels = LabelBuilder::new().build(&prices).unwrap();
        assert_eq!(labels.labels(), &[Direction::Down, Direction::Up]);
    }

    #[test]
    fn test_align_rejects_shorter_table() {
        let prices = PriceSeries::new(dates(4), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let table = FeatureTable::from_columns(
            dates(3),
            vec![("x".to_string(), vec![Some(1.0), Some(2.0), Some(3.0)])],
        )
        .unwrap();

        let result = LabelBuilder::new().label(&prices, &table);
        assert!(matches!(result, Err(TrendcastError::Schema(_))));
    }
}
