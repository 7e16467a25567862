//! Exoplanet Pipeline CLI

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use api::{init_logging, ExoplanetPipeline, LightCurveFeatureReport, PipelineConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storage::read_light_curve_file;
use tracing::info;

#[derive(Parser)]
#[command(name = "exoplanet")]
#[command(author, version, about = "Exoplanet catalog features and light-curve classification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML, JSON, ...); EXOPLANET_* variables override it
    #[arg(short, long, env = "EXOPLANET_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a star in the KOI catalog and print its planetary features
    Catalog {
        /// Kepler input catalog identifier
        kepid: u64,
    },

    /// Print the ten statistical features of a light-curve table
    Features {
        /// CSV with a `flux` column and optional `flux_err`
        file: PathBuf,
    },

    /// Classify a light curve
    Predict {
        /// CSV with a `flux` column; resolved from `light_curve_dir` when omitted
        file: Option<PathBuf>,

        /// Kepler identifier, echoed in the result
        #[arg(short, long)]
        kepid: Option<u64>,
    },

    /// Print `kepid,target` training labels for every catalog row
    Labels,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let level = match cli.verbose {
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    init_logging(level)?;
    info!("=== Exoplanet Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let pipeline = ExoplanetPipeline::from_config(&config)?;

    match cli.command {
        Commands::Catalog { kepid } => print_json(&pipeline.query_catalog(kepid)?)?,
        Commands::Features { file } => {
            let sample = read_light_curve_file(&file).with_context(|| format!("reading {}", file.display()))?;
            let features = pipeline.light_curve_features(&sample)?;
            print_json(&LightCurveFeatureReport::from(&features))?;
        }
        Commands::Predict { file, kepid } => {
            let result = match (file, kepid) {
                (Some(file), kepid) => {
                    let sample =
                        read_light_curve_file(&file).with_context(|| format!("reading {}", file.display()))?;
                    pipeline.predict_light_curve(&sample, kepid)?
                }
                (None, Some(kepid)) => pipeline.predict_kepid(kepid)?,
                (None, None) => bail!("predict needs a light-curve file or --kepid"),
            };
            print_json(&result)?;
        }
        Commands::Labels => {
            println!("kepid,target");
            for (kepid, target) in pipeline.training_labels()? {
                println!("{},{}", kepid, target);
            }
        }
    }

    Ok(())
}
