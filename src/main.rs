mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, DataArgs, ExportArgs, FeatureSourceValue, InitConfigArgs, RunArgs};
use trendcast::config::{AppConfig, ConfigManager};
use trendcast::data::CsvConnector;
use trendcast::ml::features::FeatureConfig;
use trendcast::pipeline::{DirectionPipeline, FeatureSource};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(load_config(cli.config.as_ref())?, args),
        Commands::Export(args) => export(load_config(cli.config.as_ref())?, args),
        Commands::InitConfig(args) => init_config(args),
    }
}

fn load_config(path: Option<&std::path::PathBuf>) -> Result<AppConfig> {
    let manager = ConfigManager::new();
    if let Some(path) = path {
        manager
            .load_layered(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
    }
    Ok(manager.get())
}

fn prepare(mut config: AppConfig, data: &DataArgs) -> Result<(DirectionPipeline, polars::prelude::DataFrame, FeatureSource)> {
    if let Some(lookback) = data.lookback {
        config.dataset.lookback = lookback;
    }
    let source = match data.features {
        FeatureSourceValue::Columns => FeatureSource::Columns,
        FeatureSourceValue::Engineered => FeatureSource::Engineered(FeatureConfig::default()),
    };

    let min_rows = config.dataset.lookback + 2;
    let schema = source.input_schema(&config.schema);
    let df = CsvConnector::load_and_validate(&data.csv_path, &schema, min_rows)
        .with_context(|| format!("reading {}", data.csv_path.display()))?;

    let meta = CsvConnector::create_metadata(&data.csv_path, &df, &schema)?;
    log::info!(
        "{}: {} rows, dates {}, close range {:.2} .. {:.2}",
        meta.file_path,
        meta.num_rows,
        meta.date_range
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(none)".to_string()),
        meta.price_range.0,
        meta.price_range.1
    );

    let pipeline = DirectionPipeline::new(config)?;
    Ok((pipeline, df, source))
}

fn run(mut config: AppConfig, args: RunArgs) -> Result<()> {
    if let Some(n_folds) = args.n_folds {
        config.walk_forward.n_folds = n_folds;
    }
    if args.sequential {
        config.walk_forward.parallel = false;
    }

    let (pipeline, df, source) = prepare(config, &args.data)?;
    let report = pipeline.run(&df, &source)?;
    let json = serde_json::to_string_pretty(&report)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn export(config: AppConfig, args: ExportArgs) -> Result<()> {
    let (pipeline, df, source) = prepare(config, &args.data)?;
    let dataset = pipeline.build_dataset(&df, &source)?;

    let mut frame = dataset.to_dataframe()?;
    CsvConnector::write(&mut frame, &args.output)?;
    log::info!(
        "Exported {} samples x {} columns to {}",
        dataset.len(),
        dataset.columns().len(),
        args.output.display()
    );
    Ok(())
}

fn init_config(args: InitConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("{} already exists; pass --force to replace it", args.output.display());
    }
    ConfigManager::new().save_to_file(&args.output)?;
    log::info!("Default configuration written to {}", args.output.display());
    Ok(())
}
