//! Bellwether CLI binary.
//!
//! Runs the anomaly, feature and risk pipelines over CSV input.

mod integration;

use bellwether::anomaly::DEFAULT_ANOMALY_COLUMN;
use bellwether::frame::{DATE_COLUMN, Frame};
use bellwether::output::{ExportFormat, Exporter, FrameExport, RunSummary};
use bellwether::{
    PipelineConfig, run_anomaly_pipeline, run_feature_pipeline, run_risk_pipeline,
    summarize_anomalies, summarize_risk,
};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use integration::csv_loader::{load_frame, load_weights};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bellwether")]
#[command(about = "Bellwether: market anomaly detection and risk indexing", long_about = None)]
#[command(version)]
struct Cli {
    /// Pipeline configuration file (JSON); flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Name of the date column in input files
    #[arg(long, default_value = DATE_COLUMN, global = true)]
    date_column: String,

    /// Rows of the result table to preview
    #[arg(long, default_value = "10", global = true)]
    preview: usize,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flag anomalous volatility in a price series
    Anomalies {
        /// Input CSV with a date column and a price column
        #[arg(long)]
        input: PathBuf,

        /// Price column
        #[arg(long, default_value = "close")]
        price_column: String,

        /// Rolling volatility window (default: 30)
        #[arg(long)]
        window: Option<usize>,

        /// Expected fraction of anomalous rows, in (0, 0.5] (default: 0.05)
        #[arg(long)]
        contamination: Option<f64>,

        /// Random seed (default: 42)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of trees (default: 100)
        #[arg(long)]
        trees: Option<usize>,

        /// Write the full result table to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Compute rolling features of a price series
    Features {
        /// Input CSV with a date column and a price column
        #[arg(long)]
        input: PathBuf,

        /// Price column
        #[arg(long, default_value = "close")]
        price_column: String,

        /// Moving average window (default: 20)
        #[arg(long)]
        ma_window: Option<usize>,

        /// Z-score window (default: 30)
        #[arg(long)]
        z_window: Option<usize>,

        /// Volatility window (default: 30)
        #[arg(long)]
        vol_window: Option<usize>,

        /// Column to correlate the prices against
        #[arg(long)]
        against: Option<String>,

        /// Correlation window (default: 30)
        #[arg(long, requires = "against")]
        corr_window: Option<usize>,

        /// Write the full result table to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Combine indicators into a weighted market risk score
    Risk {
        /// Input CSV with a date column and numeric indicator columns
        #[arg(long)]
        input: PathBuf,

        /// Weights file: a JSON object of indicator -> weight
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Fail unless the weights name exactly the numeric columns
        #[arg(long)]
        strict_weights: bool,

        /// Write the full result table to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
    PrettyJson,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
            OutputFormat::PrettyJson => Self::PrettyJson,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Anomalies {
            input,
            price_column,
            window,
            contamination,
            seed,
            trees,
            output,
            format,
        } => {
            if let Some(window) = window {
                config.volatility.window = window;
            }
            if let Some(contamination) = contamination {
                config.anomaly.contamination = contamination;
            }
            if let Some(seed) = seed {
                config.anomaly.seed = seed;
            }
            if let Some(trees) = trees {
                config.anomaly.n_estimators = trees;
            }

            let frame = load_frame(&input, &cli.date_column)?;
            let prices = frame.series(&price_column)?;
            let table = run_anomaly_pipeline(&prices, &config)?;
            let summary = summarize_anomalies("anomalies", &table, DEFAULT_ANOMALY_COLUMN)?;
            emit(&table, &summary, cli.preview, output.as_deref(), format)?;
        }
        Commands::Features {
            input,
            price_column,
            ma_window,
            z_window,
            vol_window,
            against,
            corr_window,
            output,
            format,
        } => {
            if let Some(window) = ma_window {
                config.moving_average.window = window;
            }
            if let Some(window) = z_window {
                config.z_score.window = window;
            }
            if let Some(window) = vol_window {
                config.volatility.window = window;
            }
            if let Some(window) = corr_window {
                config.correlation.window = window;
            }

            let frame = load_frame(&input, &cli.date_column)?;
            let prices = frame.series(&price_column)?;
            let benchmark = against.map(|name| frame.series(&name)).transpose()?;
            let table = run_feature_pipeline(&prices, benchmark.as_ref(), &config)?;
            let summary = RunSummary::new("features", &table);
            emit(&table, &summary, cli.preview, output.as_deref(), format)?;
        }
        Commands::Risk {
            input,
            weights,
            strict_weights,
            output,
            format,
        } => {
            if let Some(path) = weights {
                config.weights = Some(load_weights(&path)?);
            }

            let frame = load_frame(&input, &cli.date_column)?;
            if strict_weights {
                if let Some(weights) = &config.weights {
                    weights.validate_columns(&frame)?;
                }
            }
            let table = run_risk_pipeline(&frame, &config)?;
            let summary = summarize_risk("risk", &table)?;
            emit(&table, &summary, cli.preview, output.as_deref(), format)?;
        }
    }

    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print the summary and a preview, then write the table if asked.
fn emit(
    table: &Frame,
    summary: &RunSummary,
    preview: usize,
    output: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", summary.to_ascii_table());
    if preview > 0 {
        println!("{}", table.to_dataframe()?.tail(Some(preview)));
    }

    if let Some(path) = output {
        let format = match format {
            Some(format) => format.into(),
            None => ExportFormat::from_path(path)?,
        };
        FrameExport::new(table).export_to_file(path, format)?;
        info!(path = %path.display(), format = format.extension(), "wrote result table");
        println!("Wrote {} rows to {}", table.height(), path.display());
    }
    Ok(())
}
