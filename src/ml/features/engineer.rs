use super::table::{FeatureTable, PriceSeries};
use crate::error::{Result, TrendcastError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub momentum_features: bool,
    pub trend_features: bool,
    pub volatility_features: bool,
    pub volume_features: bool,
    /// Lagged log returns 1..=return_lags
    pub return_lags: usize,
    pub volatility_windows: Vec<usize>, // e.g., [5, 20]
    pub rsi_window: usize,
    pub volume_window: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            momentum_features: true,
            trend_features: true,
            volatility_features: true,
            volume_features: true,
            return_lags: 5,
            volatility_windows: vec![5, 20],
            rsi_window: 14,
            volume_window: 20,
        }
    }
}

/// Reference feature engineer producing causal daily indicators.
///
/// The value on day `t` only reads closes up to and including `t`. Days
/// without enough history are `None`; nothing is back- or zero-filled.
pub struct FeatureEngineer {
    config: FeatureConfig,
}

impl FeatureConfig {
    fn validate(&self) -> Result<()> {
        let windows = [
            ("rsi_window", self.rsi_window),
            ("volume_window", self.volume_window),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(TrendcastError::Configuration(format!(
                "Feature {} must be at least 1",
                name
            )));
        }
        if let Some(w) = self.volatility_windows.iter().find(|&&w| w < 2) {
            return Err(TrendcastError::Configuration(format!(
                "Volatility window {} is too short for a sample standard deviation",
                w
            )));
        }
        Ok(())
    }
}

impl FeatureEngineer {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn engineer(
        &self,
        prices: &PriceSeries,
        volume: Option<&[Option<f64>]>,
    ) -> Result<FeatureTable> {
        self.config.validate()?;
        let closes = prices.closes();

        let mut inputs = vec![
            Column::new("close".into(), closes.to_vec()),
            Column::new("log_return".into(), log_returns(closes)),
        ];
        let mut exprs: Vec<Expr> = Vec::new();

        if self.config.momentum_features {
            exprs.push(col("log_return"));
            for lag in 1..=self.config.return_lags {
                exprs.push(
                    col("log_return")
                        .shift(lit(lag as i64))
                        .alias(format!("return_lag_{}", lag)),
                );
            }
            let window = self.config.rsi_window;
            exprs.push(rsi(col("close"), window).alias(format!("rsi_{}", window)));
        }

        if self.config.trend_features {
            let sma = |window| col("close").rolling_mean(fixed_window(window));
            exprs.push(ratio(col("close"), sma(20)).alias("ratio_close_sma20"));
            exprs.push(ratio(sma(10), sma(50)).alias("ratio_sma10_sma50"));
        }

        if self.config.volatility_features {
            for &window in &self.config.volatility_windows {
                exprs.push(
                    col("log_return")
                        .rolling_std(fixed_window(window))
                        .alias(format!("volatility_{}", window)),
                );
            }
        }

        if self.config.volume_features {
            if let Some(volume) = volume {
                if volume.len() != closes.len() {
                    return Err(TrendcastError::Schema(format!(
                        "Volume has {} values for {} closes",
                        volume.len(),
                        closes.len()
                    )));
                }
                let window = self.config.volume_window;
                inputs.push(Column::new("volume".into(), volume.to_vec()));
                exprs.push(
                    ratio(col("volume"), col("volume").rolling_mean(fixed_window(window)))
                        .alias(format!("volume_ratio_{}", window)),
                );
            } else {
                log::debug!("No volume column mapped, skipping volume features");
            }
        }

        if exprs.is_empty() {
            return Err(TrendcastError::Configuration(
                "Feature engineer has every feature group disabled".to_string(),
            ));
        }

        let out = DataFrame::new(inputs)?.lazy().select(exprs).collect()?;
        let columns = out
            .get_columns()
            .iter()
            .map(|c| {
                let values: Vec<Option<f64>> = c.f64()?.into_iter().collect();
                Ok((c.name().to_string(), values))
            })
            .collect::<Result<Vec<_>>>()?;

        FeatureTable::from_columns(prices.dates().to_vec(), columns)
    }
}

/// Trailing window that stays null until it holds `window` non-null values
fn fixed_window(window: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        ..Default::default()
    }
}

/// `num / den`, null where the denominator is 0
fn ratio(num: Expr, den: Expr) -> Expr {
    when(den.clone().neq(lit(0.0)))
        .then(num / den)
        .otherwise(lit(NULL).cast(DataType::Float64))
}

fn log_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    for i in 1..closes.len() {
        if closes[i] > 0.0 && closes[i - 1] > 0.0 {
            out[i] = Some((closes[i] / closes[i - 1]).ln());
        }
    }
    out
}

/// Simple-average RSI over the last `window` close-to-close changes
fn rsi(close: Expr, window: usize) -> Expr {
    let change = close.clone() - close.shift(lit(1i64));
    let gains = change.clone() * change.clone().gt(lit(0.0)).cast(DataType::Float64);
    let losses = lit(0.0) - change.clone() * change.lt(lit(0.0)).cast(DataType::Float64);

    let gain_sum = gains.rolling_sum(fixed_window(window));
    let loss_sum = losses.rolling_sum(fixed_window(window));
    when(loss_sum.clone().eq(lit(0.0)))
        .then(lit(100.0))
        .otherwise(lit(100.0) - lit(100.0) / (lit(1.0) + gain_sum / loss_sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prices(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let dates = (0..closes.len())
            .map(|i| start + chrono::Days::new(i as u64))
            .collect();
        PriceSeries::new(dates, closes.to_vec()).unwrap()
    }

    #[test]
    fn test_warm_up_is_missing_not_zero() {
        let series = prices(&[100.0, 101.0, 102.0, 101.0, 103.0, 104.0, 103.0]);
        let engineer = FeatureEngineer::new(FeatureConfig {
            trend_features: false,
            volatility_features: false,
            volume_features: false,
            return_lags: 2,
            rsi_window: 3,
            ..Default::default()
        });

        let table = engineer.engineer(&series, None).unwrap();
        assert_eq!(
            table.feature_names(),
            &["log_return", "return_lag_1", "return_lag_2", "rsi_3"]
        );
        // log_return needs 1 prior day, lag_2 needs 3, rsi_3 needs 3
        assert_eq!(table.row(0), &[None, None, None, None]);
        assert!(!table.is_complete(2));
        assert!(table.is_complete(3));
    }

    #[test]
    fn test_lagged_return_is_shifted_copy() {
        let series = prices(&[100.0, 110.0, 121.0, 121.0]);
        let engineer = FeatureEngineer::new(FeatureConfig {
            trend_features: false,
            volatility_features: false,
            volume_features: false,
            return_lags: 1,
            rsi_window: 2,
            ..Default::default()
        });

        let table = engineer.engineer(&series, None).unwrap();
        let today = table.row(2)[0].unwrap();
        let yesterday_lagged = table.row(3)[1].unwrap();
        assert!((today - yesterday_lagged).abs() < 1e-15);
        assert!((today - 1.1f64.ln()).abs() < 1e-12);
    }

    fn only(config: FeatureConfig) -> FeatureConfig {
        FeatureConfig {
            momentum_features: false,
            trend_features: false,
            volatility_features: false,
            volume_features: false,
            ..config
        }
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let engineer = FeatureEngineer::new(FeatureConfig {
            momentum_features: true,
            return_lags: 0,
            rsi_window: 3,
            ..only(FeatureConfig::default())
        });
        let table = engineer.engineer(&prices(&[1.0, 2.0, 3.0, 4.0]), None).unwrap();
        let rsi: Vec<Option<f64>> = (0..4).map(|i| table.row(i)[1]).collect();
        assert_eq!(rsi, vec![None, None, None, Some(100.0)]);
    }

    #[test]
    fn test_rsi_mixed_changes() {
        // changes +2, -1, +1: gains 3, losses 1
        let engineer = FeatureEngineer::new(FeatureConfig {
            momentum_features: true,
            return_lags: 0,
            rsi_window: 3,
            ..only(FeatureConfig::default())
        });
        let table = engineer
            .engineer(&prices(&[10.0, 12.0, 11.0, 12.0]), None)
            .unwrap();
        assert!((table.row(3)[1].unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_windows_keep_warm_up_null() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
        let engineer = FeatureEngineer::new(FeatureConfig {
            trend_features: true,
            volatility_features: true,
            volatility_windows: vec![5],
            ..only(FeatureConfig::default())
        });
        let table = engineer.engineer(&prices(&closes), None).unwrap();
        assert_eq!(
            table.feature_names(),
            &["ratio_close_sma20", "ratio_sma10_sma50", "volatility_5"]
        );

        // sma20 needs 20 closes, sma50 needs 50, 5 returns need 6 closes
        assert!(table.row(18)[0].is_none());
        let sma20: f64 = closes[..20].iter().sum::<f64>() / 20.0;
        assert!((table.row(19)[0].unwrap() - closes[19] / sma20).abs() < 1e-12);
        assert!(table.row(48)[1].is_none());
        assert!(table.row(49)[1].is_some());
        assert!(table.row(4)[2].is_none());

        let returns: Vec<f64> = (1..6).map(|i| (closes[i] / closes[i - 1]).ln()).collect();
        let mean = returns.iter().sum::<f64>() / 5.0;
        let sample_std = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 4.0).sqrt();
        assert!((table.row(5)[2].unwrap() - sample_std).abs() < 1e-10);
    }

    #[test]
    fn test_volume_ratio_against_trailing_mean() {
        let engineer = FeatureEngineer::new(FeatureConfig {
            volume_features: true,
            volume_window: 3,
            ..only(FeatureConfig::default())
        });
        let volume = vec![Some(10.0), Some(20.0), Some(30.0), None, Some(40.0), Some(50.0), Some(60.0)];
        let table = engineer
            .engineer(&prices(&[1.0; 7]), Some(&volume))
            .unwrap();
        let ratios: Vec<Option<f64>> = (0..7).map(|i| table.row(i)[0]).collect();

        assert_eq!(ratios[..2], [None, None]);
        assert!((ratios[2].unwrap() - 1.5).abs() < 1e-12);
        // the missing day poisons every window it falls in
        assert_eq!(ratios[3..6], [None, None, None]);
        assert!((ratios[6].unwrap() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_short_volatility_window_rejected() {
        let engineer = FeatureEngineer::new(FeatureConfig {
            volatility_windows: vec![1],
            ..FeatureConfig::default()
        });
        assert!(matches!(
            engineer.engineer(&prices(&[1.0, 2.0, 3.0]), None),
            Err(TrendcastError::Configuration(_))
        ));
    }

    #[test]
    fn test_volume_length_checked() {
        let series = prices(&[100.0, 101.0]);
        let engineer = FeatureEngineer::new(FeatureConfig::default());
        let volume = vec![Some(1.0)];
        assert!(engineer.engineer(&series, Some(&volume)).is_err());
    }
}
