use chrono::NaiveDate;
use ndarray::Axis;
use trendcast::config::{ScalingConfig, ZeroVariancePolicy};
use trendcast::engines::scaling::StandardScaler;
use trendcast::engines::splitters::ChronologicalSplitter;
use trendcast::ml::dataset::TabularDataset;
use trendcast::types::{feature_matrix, DateRange, Direction};
use trendcast::TrendcastError;

fn dataset(rows: Vec<Vec<f64>>) -> TabularDataset {
    let start = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
    let n = rows.len();
    let dates = (0..n)
        .map(|i| start + chrono::Days::new(i as u64 + 1))
        .collect();
    let windows = (0..n)
        .map(|i| {
            let d = start + chrono::Days::new(i as u64);
            DateRange::new(d, d)
        })
        .collect();
    let labels = (0..n)
        .map(|i| if i % 2 == 0 { Direction::Up } else { Direction::Down })
        .collect();
    TabularDataset::new(
        vec!["a_lag_1".to_string(), "b_lag_1".to_string()],
        dates,
        windows,
        feature_matrix(n, 2, rows.concat()).unwrap(),
        labels,
    )
    .unwrap()
}

#[test]
fn test_test_partition_does_not_leak_into_scaler() {
    let train_rows: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64, (i * i) as f64]).collect();

    let mut calm = train_rows.clone();
    calm.extend((0..2).map(|i| vec![10.0 + i as f64, 5.0]));
    let mut extreme = train_rows.clone();
    extreme.extend((0..2).map(|i| vec![1e6 * (i + 1) as f64, -1e6]));

    let splitter = ChronologicalSplitter::new(0.8).unwrap();
    let scaler = StandardScaler::default();
    let a = scaler
        .fit(&splitter.split_once(&dataset(calm)).unwrap().train)
        .unwrap();
    let b = scaler
        .fit(&splitter.split_once(&dataset(extreme)).unwrap().train)
        .unwrap();

    assert_eq!(a.means(), b.means());
    assert_eq!(a.scales(), b.scales());
}

#[test]
fn test_train_becomes_standard_normal() {
    let data = dataset((0..10).map(|i| vec![i as f64 * 2.5, 100.0 - i as f64]).collect());
    let split = ChronologicalSplitter::new(0.6).unwrap().split_once(&data).unwrap();
    let scaler = StandardScaler::default().fit(&split.train).unwrap();
    let scaled = scaler.apply(&split.train).unwrap();

    let x = scaled.features();
    let means = x.mean_axis(Axis(0)).unwrap();
    let stds = x.std_axis(Axis(0), 0.0);
    for (mean, std) in means.iter().zip(stds.iter()) {
        assert!(mean.abs() < 1e-9);
        assert!((std - 1.0).abs() < 1e-9);
    }

    // test side uses the train statistics unchanged
    let test = scaler.apply(&split.test).unwrap();
    let expected = (split.test.features()[[0, 0]] - scaler.means()[0]) / scaler.scales()[0];
    assert_eq!(test.features()[[0, 0]], expected);
}

#[test]
fn test_zero_variance_policy_is_explicit() {
    let data = dataset((0..6).map(|i| vec![i as f64, 3.0]).collect());
    let split = ChronologicalSplitter::new(0.5).unwrap().split_once(&data).unwrap();

    let strict = StandardScaler::new(&ScalingConfig {
        zero_variance: ZeroVariancePolicy::Error,
        ..ScalingConfig::default()
    });
    match strict.fit(&split.train) {
        Err(TrendcastError::NumericDegeneracy { column, .. }) => assert_eq!(column, "b_lag_1"),
        other => panic!("expected numeric degeneracy, got {:?}", other),
    }

    let lenient = StandardScaler::new(&ScalingConfig {
        zero_variance: ZeroVariancePolicy::UnitScale,
        ..ScalingConfig::default()
    });
    let scaler = lenient.fit(&split.train).unwrap();
    assert_eq!(scaler.scales()[1], 1.0);
    assert_eq!(scaler.unit_scaled_columns(), &["b_lag_1".to_string()]);
    let scaled = scaler.apply(&split.test).unwrap();
    assert_eq!(scaled.features()[[0, 1]], 0.0);
}

#[test]
fn test_fit_on_test_partition_rejected() {
    let data = dataset((0..10).map(|i| vec![i as f64, (i % 3) as f64]).collect());
    let split = ChronologicalSplitter::new(0.7).unwrap().split_once(&data).unwrap();
    assert!(matches!(
        StandardScaler::default().fit(&split.test),
        Err(TrendcastError::Configuration(_))
    ));
}

#[test]
fn test_schema_mismatch_on_apply() {
    let data = dataset((0..4).map(|i| vec![i as f64, i as f64 * 2.0]).collect());
    let scaler = StandardScaler::default().fit(&data).unwrap();

    let other = TabularDataset::new(
        vec!["c_lag_1".to_string(), "b_lag_1".to_string()],
        data.dates().to_vec(),
        data.feature_windows().to_vec(),
        data.features().clone(),
        data.labels().to_vec(),
    )
    .unwrap();
    assert!(matches!(scaler.apply(&other), Err(TrendcastError::Schema(_))));
}
