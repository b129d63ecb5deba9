use super::traits::ConfigSection;
use crate::error::TrendcastError;
use crate::types::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Main model, fitted with the training partition's class weight
    pub kind: ModelKind,
    /// Reference model scored on the same static split without class weighting
    #[serde(default = "default_baseline")]
    pub baseline: ModelKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelKind {
    Constant { prediction: Direction },
    Majority,
    LogisticRegression {
        learning_rate: f64,
        epochs: usize,
        l2: f64,
    },
}

impl Default for ModelKind {
    fn default() -> Self {
        Self::LogisticRegression {
            learning_rate: 0.05,
            epochs: 200,
            l2: 1e-3,
        }
    }
}

impl ModelKind {
    fn validate(&self) -> Result<(), TrendcastError> {
        if let Self::LogisticRegression {
            learning_rate,
            epochs,
            l2,
        } = self
        {
            if !(*learning_rate > 0.0 && learning_rate.is_finite()) {
                return Err(TrendcastError::Configuration(
                    "Learning rate must be positive".to_string(),
                ));
            }
            if *epochs == 0 {
                return Err(TrendcastError::Configuration(
                    "Logistic regression needs at least one epoch".to_string(),
                ));
            }
            if *l2 < 0.0 {
                return Err(TrendcastError::Configuration(
                    "L2 penalty cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn default_baseline() -> ModelKind {
    ModelKind::default()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            baseline: default_baseline(),
        }
    }
}

impl ConfigSection for ModelConfig {
    fn section_name() -> &'static str {
        "model"
    }

    fn validate(&self) -> Result<(), TrendcastError> {
        self.kind.validate()?;
        self.baseline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_defaults_when_missing() {
        let config: ModelConfig = toml::from_str(
            r#"
            [kind]
            Constant = { prediction = "Up" }
            "#,
        )
        .unwrap();
        assert_eq!(
            config.kind,
            ModelKind::Constant {
                prediction: Direction::Up
            }
        );
        assert_eq!(config.baseline, ModelKind::default());
    }

    #[test]
    fn test_invalid_baseline_rejected() {
        let config = ModelConfig {
            baseline: ModelKind::LogisticRegression {
                learning_rate: 0.1,
                epochs: 0,
                l2: 0.0,
            },
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
