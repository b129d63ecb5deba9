use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "trendcast",
    about = "Leakage-safe next-day direction datasets and walk-forward evaluation"
)]
pub struct Cli {
    /// TOML config; `TRENDCAST__SECTION__FIELD` environment variables override it
    #[arg(long, global = true, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dataset, score the static holdout and run walk-forward validation
    Run(RunArgs),

    /// Write the windowed sample table to CSV
    Export(ExportArgs),

    /// Write the default configuration to a TOML file
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),
}

#[derive(Parser, Debug)]
pub struct DataArgs {
    /// Path to the input CSV with a date column and daily closes
    #[arg(long = "csv", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub csv_path: PathBuf,

    /// Where per-day features come from
    #[arg(long, default_value = "columns")]
    pub features: FeatureSourceValue,

    /// Override the configured lookback
    #[arg(long)]
    pub lookback: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Override the configured number of walk-forward folds
    #[arg(long = "folds")]
    pub n_folds: Option<usize>,

    /// Run folds one after another instead of on the thread pool
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Write the JSON report here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Destination CSV
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct InitConfigArgs {
    #[arg(long, value_name = "FILE", default_value = "trendcast.toml")]
    pub output: PathBuf,

    /// Replace an existing file
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FeatureSourceValue {
    /// Schema feature columns as they appear in the CSV
    Columns,
    /// Built-in indicators computed from close and volume
    Engineered,
}
