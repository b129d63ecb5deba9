use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendcastError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Degenerate fold {fold}: {reason}")]
    DegenerateFold { fold: usize, reason: String },

    #[error("Numeric degeneracy in column '{column}': {reason}")]
    NumericDegeneracy { column: String, reason: String },

    #[error("Temporal order violated: {0}")]
    TemporalOrder(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

impl TrendcastError {
    /// True for failures that a single walk-forward fold can absorb without
    /// aborting the run.
    pub fn is_fold_local(&self) -> bool {
        matches!(
            self,
            Self::DegenerateFold { .. } | Self::NumericDegeneracy { .. } | Self::Model(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrendcastError>;
