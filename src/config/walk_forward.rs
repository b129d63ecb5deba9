use super::traits::ConfigSection;
use crate::error::TrendcastError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub n_folds: usize,
    /// Run folds on the rayon pool instead of sequentially
    pub parallel: bool,
    /// Fold `j` fits its model with seed `base_seed + j`
    pub base_seed: u64,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            n_folds: 3,
            parallel: true,
            base_seed: 42,
        }
    }
}

impl ConfigSection for WalkForwardConfig {
    fn section_name() -> &'static str {
        "walk_forward"
    }

    fn validate(&self) -> Result<(), TrendcastError> {
        if self.n_folds == 0 {
            return Err(TrendcastError::Configuration(
                "Walk-forward needs at least one fold".to_string(),
            ));
        }
        Ok(())
    }
}
