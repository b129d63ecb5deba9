use super::traits::ConfigSection;
use crate::error::TrendcastError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Trailing days flattened into one sample
    pub lookback: usize,
    /// Share of samples in the chronological train prefix
    pub train_fraction: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            lookback: 5,
            train_fraction: 0.8,
        }
    }
}

impl ConfigSection for DatasetConfig {
    fn section_name() -> &'static str {
        "dataset"
    }

    fn validate(&self) -> Result<(), TrendcastError> {
        if self.lookback == 0 {
            return Err(TrendcastError::Configuration(
                "Lookback size must be a positive integer".to_string(),
            ));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(TrendcastError::Configuration(format!(
                "Train fraction must be strictly between 0 and 1, got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }
}

/// What to do with a column whose training variance is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroVariancePolicy {
    /// Fail the fit with a numeric degeneracy error
    Error,
    /// Keep scale = 1 so the column is only centered
    UnitScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub zero_variance: ZeroVariancePolicy,
    /// Standard deviations at or below this are treated as zero
    pub min_std: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            zero_variance: ZeroVariancePolicy::UnitScale,
            min_std: 1e-12,
        }
    }
}

impl ConfigSection for ScalingConfig {
    fn section_name() -> &'static str {
        "scaling"
    }

    fn validate(&self) -> Result<(), TrendcastError> {
        if !self.min_std.is_finite() || self.min_std < 0.0 {
            return Err(TrendcastError::Configuration(
                "min_std must be a finite, non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_lookback_rejected() {
        let config = DatasetConfig {
            lookback: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrendcastError::Configuration(_))));
    }

    #[test]
    fn test_train_fraction_bounds() {
        for p in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let config = DatasetConfig {
                train_fraction: p,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "fraction {} should be rejected", p);
        }
        assert!(DatasetConfig::default().validate().is_ok());
    }
}
