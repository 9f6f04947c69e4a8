//! CLI entry point for the Higgs event preprocessing pipeline.

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::Parser;
use higgs_prep::{Pipeline, PipelineConfig, PipelineOutput};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Higgs event preprocessing pipeline",
    long_about = "Transforms raw ATLAS event CSVs into a standardized feature matrix\n\
                  and a binary label vector for a downstream classifier.\n\n\
                  EXAMPLES:\n  \
                  # Preprocess a training file\n  \
                  higgs-prep -t training.csv\n\n  \
                  # Also transform the held-out split with training statistics\n  \
                  higgs-prep -t training.csv --held-out test.csv -o results/\n\n  \
                  # Looser outlier fences, no weight column\n  \
                  higgs-prep -t training.csv --fence-multiplier 3.0 --no-weights"
)]
struct Args {
    /// Path to the training CSV (reference split for all fitted statistics)
    #[arg(short, long)]
    train: String,

    /// Path to the held-out CSV, transformed but never filtered
    #[arg(long)]
    held_out: Option<String>,

    /// Output directory for processed matrices and the run summary
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Sentinel value marking physically undefined measurements
    #[arg(long, default_value_t = -999.0, allow_hyphen_values = true)]
    sentinel: f64,

    /// Multiplier k in the outlier fence [Q1 - k*IQR, Q3 + k*IQR]
    #[arg(long, default_value_t = 1.5)]
    fence_multiplier: f64,

    /// Skip outlier filtering on the training split
    #[arg(long)]
    no_filter: bool,

    /// Event identifier column name
    #[arg(long, default_value = "EventId")]
    id_column: String,

    /// Target label column name
    #[arg(long, default_value = "Label")]
    label_column: String,

    /// Per-event weight column name
    #[arg(long, default_value = "Weight")]
    weight_column: String,

    /// The training split carries no weight column
    #[arg(long)]
    no_weights: bool,

    /// Label category encoding to 0
    #[arg(long, default_value = "b")]
    background_label: String,

    /// Label category encoding to 1
    #[arg(long, default_value = "s")]
    signal_label: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Suppress all output except warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_csv(path: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .with_context(|| format!("Failed to open CSV reader for {}", path))?
        .finish()
        .with_context(|| format!("Failed to read CSV file {}", path))
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_outputs(output: &PipelineOutput, dir: &Path, label_column: &str) -> Result<()> {
    let mut train = output.train.features.clone();
    train.with_column(output.train.labels.clone().with_name(label_column.into()))?;
    if let Some(weights) = &output.train.weights {
        train.with_column(weights.clone())?;
    }
    let train_path = dir.join("processed_train.csv");
    write_csv(&mut train, &train_path)?;
    info!("Wrote training matrix to {}", train_path.display());

    if let Some(held_out) = &output.test {
        let mut test = held_out.features.clone();
        let mut with_ids = DataFrame::new(vec![held_out.ids.clone().into()])?;
        with_ids.hstack_mut(test.get_columns())?;
        test = with_ids;
        let test_path = dir.join("processed_held_out.csv");
        write_csv(&mut test, &test_path)?;
        info!("Wrote held-out matrix to {}", test_path.display());
    }

    let report = serde_json::json!({
        "generated_at": Local::now().to_rfc3339(),
        "summary": output.summary,
        "imputation_means": output.impute_stats,
        "scaling": output.scale_stats,
    });
    let summary_path = dir.join("run_summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&report)?)?;
    info!("Wrote run summary to {}", summary_path.display());

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet);

    if !Path::new(&args.train).exists() {
        return Err(anyhow!("Training file not found: {}", args.train));
    }
    if let Some(held_out) = &args.held_out {
        if !Path::new(held_out).exists() {
            return Err(anyhow!("Held-out file not found: {}", held_out));
        }
    }

    let output_dir = PathBuf::from(&args.output);
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
        info!("Created output directory: {}", output_dir.display());
    }

    info!("Loading training split from: {}", args.train);
    let train = load_csv(&args.train)?;
    info!("Training split loaded: {:?}", train.shape());

    let held_out = match &args.held_out {
        Some(path) => {
            info!("Loading held-out split from: {}", path);
            let df = load_csv(path)?;
            info!("Held-out split loaded: {:?}", df.shape());
            Some(df)
        }
        None => None,
    };

    let mut config_builder = PipelineConfig::builder()
        .sentinel(args.sentinel)
        .fence_multiplier(args.fence_multiplier)
        .filter_outliers(!args.no_filter)
        .id_column(&args.id_column)
        .label_column(&args.label_column)
        .background_label(&args.background_label)
        .signal_label(&args.signal_label);
    config_builder = if args.no_weights {
        config_builder.no_weight_column()
    } else {
        config_builder.weight_column(&args.weight_column)
    };
    let config = config_builder.build()?;

    let pipeline = Pipeline::builder().config(config).build()?;
    let output = pipeline.run(train, held_out)?;

    info!(
        "Done: {} training rows ({} removed as outliers), {} features, {} sentinel values converted",
        output.summary.rows_after,
        output.summary.rows_removed,
        output.summary.feature_count,
        output.summary.sentinel_replacements,
    );

    write_outputs(&output, &output_dir, &args.label_column)?;

    Ok(())
}
