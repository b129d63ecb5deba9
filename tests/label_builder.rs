use chrono::NaiveDate;
use trendcast::ml::features::{FeatureTable, PriceSeries};
use trendcast::ml::labeling::LabelBuilder;
use trendcast::types::Direction::{self, Down, Up};
use trendcast::TrendcastError;

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
    (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
}

#[test]
fn test_flat_day_is_down_and_last_day_dropped() {
    let prices = PriceSeries::new(dates(4), vec![100.0, 105.0, 102.0, 102.0]).unwrap();
    let labels = LabelBuilder::new().build(&prices).unwrap();

    assert_eq!(labels.labels(), &[Up, Down, Down]);
    assert_eq!(labels.dates(), &dates(4)[..3]);
    assert_eq!(labels.dropped_date(), dates(4)[3]);
}

#[test]
fn test_labels_match_close_comparison() {
    let closes = vec![10.0, 10.5, 10.5, 9.0, 12.0, 11.9, 11.95, 13.0];
    let prices = PriceSeries::new(dates(closes.len()), closes.clone()).unwrap();
    let labels = LabelBuilder::new().build(&prices).unwrap();

    assert_eq!(labels.len(), closes.len() - 1);
    for (t, label) in labels.labels().iter().enumerate() {
        assert_eq!(*label, Direction::from_closes(closes[t], closes[t + 1]));
    }
}

#[test]
fn test_alignment_drops_final_feature_row() {
    let prices = PriceSeries::new(dates(4), vec![1.0, 2.0, 1.0, 3.0]).unwrap();
    let features = FeatureTable::from_columns(
        dates(4),
        vec![("x".to_string(), vec![Some(0.1), Some(0.2), Some(0.3), Some(0.4)])],
    )
    .unwrap();

    let labeled = LabelBuilder::new().label(&prices, &features).unwrap();
    assert_eq!(labeled.len(), 3);
    assert_eq!(labeled.features().len(), 3);
    assert_eq!(labeled.features().row(2), &[Some(0.3)]);
    assert_eq!(labeled.labels(), &[Up, Down, Up]);
}

#[test]
fn test_misaligned_feature_table() {
    let prices = PriceSeries::new(dates(4), vec![1.0, 2.0, 1.0, 3.0]).unwrap();
    let features = FeatureTable::from_columns(
        dates(3),
        vec![("x".to_string(), vec![Some(0.1), Some(0.2), Some(0.3)])],
    )
    .unwrap();

    assert!(matches!(
        LabelBuilder::new().label(&prices, &features),
        Err(TrendcastError::Schema(_))
    ));
}

#[test]
fn test_too_short_series() {
    let prices = PriceSeries::new(dates(1), vec![100.0]).unwrap();
    assert!(matches!(
        LabelBuilder::new().build(&prices),
        Err(TrendcastError::Configuration(_))
    ));
}
