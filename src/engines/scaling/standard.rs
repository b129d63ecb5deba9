use crate::config::{ScalingConfig, ZeroVariancePolicy};
use crate::error::{Result, TrendcastError};
use crate::ml::dataset::{PartitionRole, TabularDataset};
use crate::types::DateRange;
use ndarray::{ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Unfitted standardization settings. `fit` hands back a separate, immutable
/// [`FittedScaler`]; there is no way to refit one.
#[derive(Debug, Clone, Copy)]
pub struct StandardScaler {
    policy: ZeroVariancePolicy,
    min_std: f64,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new(&ScalingConfig::default())
    }
}

impl StandardScaler {
    pub fn new(config: &ScalingConfig) -> Self {
        Self {
            policy: config.zero_variance,
            min_std: config.min_std,
        }
    }

    pub fn with_policy(mut self, policy: ZeroVariancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Per-column mean and population standard deviation of a training partition
    pub fn fit(&self, train: &TabularDataset) -> Result<FittedScaler> {
        if train.role() == PartitionRole::Test {
            return Err(TrendcastError::Configuration(format!(
                "Refusing to fit a scaler on the test partition {}",
                train
                    .date_range()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "(empty)".to_string())
            )));
        }
        let x = train.features();
        let means = x.mean_axis(Axis(0)).ok_or_else(|| {
            TrendcastError::Configuration("Cannot fit a scaler on an empty partition".to_string())
        })?;
        let stds = x.std_axis(Axis(0), 0.0);
        let mut scales = Vec::with_capacity(x.ncols());
        let mut unit_scaled = Vec::new();

        for (name, &std) in train.columns().iter().zip(stds.iter()) {
            if !std.is_finite() {
                return Err(TrendcastError::NumericDegeneracy {
                    column: name.clone(),
                    reason: "non-finite standard deviation".to_string(),
                });
            }

            let scale = if std <= self.min_std {
                match self.policy {
                    ZeroVariancePolicy::Error => {
                        return Err(TrendcastError::NumericDegeneracy {
                            column: name.clone(),
                            reason: format!(
                                "zero variance over training range {}",
                                train
                                    .date_range()
                                    .map(|r| r.to_string())
                                    .unwrap_or_default()
                            ),
                        });
                    }
                    ZeroVariancePolicy::UnitScale => {
                        unit_scaled.push(name.clone());
                        1.0
                    }
                }
            } else {
                std
            };

            scales.push(scale);
        }

        if !unit_scaled.is_empty() {
            log::warn!(
                "{} zero-variance column(s) kept with scale 1: {:?}",
                unit_scaled.len(),
                unit_scaled
            );
        }

        Ok(FittedScaler {
            columns: train.columns().to_vec(),
            means: means.to_vec(),
            scales,
            unit_scaled,
            fitted_on: train.date_range(),
        })
    }
}

/// Column statistics frozen at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    columns: Vec<String>,
    means: Vec<f64>,
    scales: Vec<f64>,
    unit_scaled: Vec<String>,
    fitted_on: Option<DateRange>,
}

impl FittedScaler {
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Columns whose training variance was zero and kept scale 1
    pub fn unit_scaled_columns(&self) -> &[String] {
        &self.unit_scaled
    }

    pub fn fitted_on(&self) -> Option<DateRange> {
        self.fitted_on
    }

    /// `(x - mean) / scale` per column, as a new partition
    pub fn apply(&self, partition: &TabularDataset) -> Result<TabularDataset> {
        if partition.columns() != self.columns.as_slice() {
            return Err(TrendcastError::Schema(format!(
                "Scaler was fitted on {} columns, partition has {} with a different layout",
                self.columns.len(),
                partition.columns().len()
            )));
        }

        let means = ArrayView1::from(self.means.as_slice());
        let scales = ArrayView1::from(self.scales.as_slice());
        let scaled = (partition.features() - &means) / &scales;

        partition.with_features(scaled)
    }
}
